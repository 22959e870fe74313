// Package data as served by the backend, plus the model a page renders from it
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    // The backend body does not always echo the id; the loader fills it in
    #[serde(default, alias = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default)]
    pub detailed_title: Option<String>,
    #[serde(default)]
    pub detailed_intro: Option<String>,
    #[serde(default)]
    pub pro_tip: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_title: String,
    #[serde(default)]
    pub section_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_content: String,
}

// Document-store backends send `null` for empty fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub hero_image_url: String,
    pub price_label: String,
    pub detailed_title: Option<String>,
    pub detailed_intro: Option<String>,
    pub sections: Vec<SectionView>,
    pub pro_tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub title: String,
    pub image_url: Option<String>,
    pub content: String,
}

impl PackageView {
    // Image paths are relative to the backend host, never to the API prefix
    pub fn build(package: &Package, base_url: &str) -> Self {
        let sections = package
            .sections
            .iter()
            .map(|section| SectionView {
                title: section.section_title.clone(),
                image_url: section
                    .section_image
                    .as_deref()
                    .filter(|path| !path.is_empty())
                    .map(|path| format!("{}/{}", base_url, path.trim_start_matches('/'))),
                content: section.section_content.clone(),
            })
            .collect();

        Self {
            id: package.id.clone(),
            title: package.title.clone(),
            description: package.description.clone(),
            hero_image_url: format!("{}{}", base_url, package.image),
            price_label: format!("USD {}", package.price),
            // The intro only renders under a detailed title
            detailed_title: non_empty(&package.detailed_title),
            detailed_intro: non_empty(&package.detailed_title)
                .and_then(|_| non_empty(&package.detailed_intro)),
            sections,
            pro_tip: non_empty(&package.pro_tip),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_package_body_deserializes() {
        let package: Package =
            serde_json::from_str(r#"{"title":"Kandy Tour","price":199,"sections":[]}"#).unwrap();

        assert_eq!(package.title, "Kandy Tour");
        assert_eq!(package.price, 199.0);
        assert!(package.sections.is_empty());
        assert!(package.pro_tip.is_none());
    }

    #[test]
    fn test_full_package_body_deserializes() {
        let body = r#"{
            "_id": "p7",
            "title": "Ella Highlands",
            "description": "Tea country by train",
            "price": 349.5,
            "image": "/uploads/ella.jpg",
            "detailedTitle": "Seven days in the hills",
            "detailedIntro": "Misty mornings and waterfalls.",
            "proTip": "Book the observation car early.",
            "sections": [
                {"sectionTitle": "Day 1", "sectionImage": "uploads/day1.jpg", "sectionContent": "Arrive in Kandy."},
                {"sectionTitle": "Day 2", "sectionContent": "Train to Ella."}
            ]
        }"#;
        let package: Package = serde_json::from_str(body).unwrap();

        assert_eq!(package.id, "p7");
        assert_eq!(package.sections.len(), 2);
        assert_eq!(package.sections[1].section_image, None);
        assert_eq!(package.detailed_title.as_deref(), Some("Seven days in the hills"));
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let body = r#"{
            "title": "Kandy Tour",
            "description": null,
            "price": null,
            "image": null,
            "detailedTitle": null,
            "proTip": null,
            "sections": [
                {"sectionTitle": "Day 1", "sectionImage": null, "sectionContent": null}
            ]
        }"#;
        let package: Package = serde_json::from_str(body).unwrap();

        assert_eq!(package.description, "");
        assert_eq!(package.price, 0.0);
        assert_eq!(package.image, "");
        assert_eq!(package.sections[0].section_content, "");
        assert_eq!(package.sections[0].section_image, None);

        let nulled: Package =
            serde_json::from_str(r#"{"title":"Kandy Tour","sections":null}"#).unwrap();
        assert!(nulled.sections.is_empty());
    }

    #[test]
    fn test_view_resolves_images_against_base_url() {
        let package: Package = serde_json::from_str(
            r#"{"title":"Ella","price":349.5,"image":"/uploads/ella.jpg","sections":[
                {"sectionTitle":"Day 1","sectionImage":"uploads/day1.jpg","sectionContent":"a"},
                {"sectionTitle":"Day 2","sectionImage":"","sectionContent":"b"}
            ]}"#,
        )
        .unwrap();

        let view = PackageView::build(&package, "https://api.example.com");
        assert_eq!(view.hero_image_url, "https://api.example.com/uploads/ella.jpg");
        assert_eq!(view.price_label, "USD 349.5");
        assert_eq!(
            view.sections[0].image_url.as_deref(),
            Some("https://api.example.com/uploads/day1.jpg")
        );
        assert_eq!(view.sections[1].image_url, None);
        assert_eq!(view.sections[1].title, "Day 2");
    }

    #[test]
    fn test_intro_hidden_without_detailed_title() {
        let package = Package {
            id: "p1".to_string(),
            title: "Kandy Tour".to_string(),
            description: String::new(),
            price: 199.0,
            image: String::new(),
            detailed_title: None,
            detailed_intro: Some("orphan intro".to_string()),
            pro_tip: Some("  ".to_string()),
            sections: vec![],
        };

        let view = PackageView::build(&package, "http://localhost");
        assert_eq!(view.price_label, "USD 199");
        assert_eq!(view.detailed_intro, None);
        assert_eq!(view.pro_tip, None);
    }
}
