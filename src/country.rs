// Dialing codes offered in the booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCode {
    pub code: &'static str,
    pub country: &'static str,
}

impl CountryCode {
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.country)
    }
}

pub const DEFAULT_COUNTRY_CODE: &str = "+94";

// Kept in display order, by country name
const COUNTRY_CODES: [CountryCode; 30] = [
    CountryCode { code: "+61", country: "Australia" },
    CountryCode { code: "+880", country: "Bangladesh" },
    CountryCode { code: "+55", country: "Brazil" },
    CountryCode { code: "+86", country: "China" },
    CountryCode { code: "+33", country: "France" },
    CountryCode { code: "+49", country: "Germany" },
    CountryCode { code: "+852", country: "Hong Kong" },
    CountryCode { code: "+91", country: "India" },
    CountryCode { code: "+62", country: "Indonesia" },
    CountryCode { code: "+39", country: "Italy" },
    CountryCode { code: "+81", country: "Japan" },
    CountryCode { code: "+60", country: "Malaysia" },
    CountryCode { code: "+52", country: "Mexico" },
    CountryCode { code: "+95", country: "Myanmar" },
    CountryCode { code: "+977", country: "Nepal" },
    CountryCode { code: "+64", country: "New Zealand" },
    CountryCode { code: "+92", country: "Pakistan" },
    CountryCode { code: "+63", country: "Philippines" },
    CountryCode { code: "+7", country: "Russia" },
    CountryCode { code: "+966", country: "Saudi Arabia" },
    CountryCode { code: "+65", country: "Singapore" },
    CountryCode { code: "+27", country: "South Africa" },
    CountryCode { code: "+82", country: "South Korea" },
    CountryCode { code: "+34", country: "Spain" },
    CountryCode { code: "+94", country: "Sri Lanka" },
    CountryCode { code: "+66", country: "Thailand" },
    CountryCode { code: "+971", country: "UAE" },
    CountryCode { code: "+44", country: "UK" },
    CountryCode { code: "+1", country: "USA/Canada" },
    CountryCode { code: "+84", country: "Vietnam" },
];

pub fn country_codes() -> &'static [CountryCode] {
    &COUNTRY_CODES
}

pub fn find(code: &str) -> Option<&'static CountryCode> {
    country_codes().iter().find(|c| c.code == code)
}

pub fn is_known(code: &str) -> bool {
    find(code).is_some()
}
