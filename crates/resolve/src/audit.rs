//! Field normalization ("audit") applied before detection.
//!
//! Raw catalogs spell the same street type, city or cuisine several ways and
//! punctuate phone numbers inconsistently. The rules here rewrite those
//! variants to one canonical form; values no rule recognizes pass through
//! unchanged.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::Serialize;

use crate::config::AuditConfig;
use crate::model::Record;

const STREET_TYPES: &[(&str, &str)] = &[
    ("ave.", "avenue"),
    ("aves", "avenues"),
    ("blv.", "boulevard"),
    ("blvd", "boulevard"),
    ("blvd.", "boulevard"),
    ("dr.", "drive"),
    ("hwy.", "highway"),
    ("ne", "northeast"),
    ("nw", "northwest"),
    ("pkwy", "parkway"),
    ("pl.", "place"),
    ("rd.", "road"),
    ("s", "south"),
    ("s.", "south"),
    ("se", "southeast"),
    ("st.", "street"),
    ("sts.", "streets"),
];

const CITIES: &[(&str, &str)] = &[
    ("la", "los angeles"),
    ("new york", "new york city"),
    ("w. hollywood", "hollywood"),
    ("west la", "los angeles"),
];

const RESTAURANT_TYPES: &[(&str, &str)] = &[
    ("american (new)", "american"),
    ("american (traditional)", "american"),
    ("bbq", "barbecue"),
    ("delis", "delicatessen"),
    ("eastern european", "east european"),
    ("french (classic)", "french"),
    ("french (new)", "french"),
    ("steak houses", "steakhouses"),
];

/// Phone separator rewritten to the catalog's majority form.
const PHONE_SEPARATOR_FROM: &str = "-";
const PHONE_SEPARATOR_TO: &str = "/";

fn table(defaults: &[(&str, &str)], overrides: &BTreeMap<String, String>) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (k, v) in overrides {
        map.insert(k.clone(), v.clone());
    }
    map
}

/// Compiled normalization rules. Build once per run.
pub struct AuditRules {
    name_qualifier: Regex,
    street_suffix: Regex,
    phone: Regex,
    street_types: HashMap<String, String>,
    cities: HashMap<String, String>,
    restaurant_types: HashMap<String, String>,
}

impl Default for AuditRules {
    fn default() -> Self {
        Self::new(&AuditConfig::default())
    }
}

impl AuditRules {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            name_qualifier: Regex::new(r"\([a-zA-Z0-9_ ]+\)").unwrap(),
            street_suffix: Regex::new(r"\b\S+\.?$").unwrap(),
            phone: Regex::new(r"(\d{3})(\s|-|/)(\d{3})(\s|-|/)(\d{4})").unwrap(),
            street_types: table(STREET_TYPES, &config.street),
            cities: table(CITIES, &config.city),
            restaurant_types: table(RESTAURANT_TYPES, &config.restaurant_type),
        }
    }

    /// Drop parenthesised qualifiers such as `(beverly hills)`.
    pub fn normalize_name(&self, name: &str) -> String {
        self.name_qualifier.replace_all(name, "").into_owned()
    }

    /// Expand an abbreviated street type at the end of the address.
    pub fn normalize_street(&self, address: &str) -> String {
        let Some(m) = self.street_suffix.find(address) else {
            return address.to_string();
        };
        match self.street_types.get(m.as_str()) {
            Some(expanded) => format!("{}{}", &address[..m.start()], expanded),
            None => address.to_string(),
        }
    }

    pub fn normalize_city(&self, city: &str) -> String {
        self.cities.get(city).cloned().unwrap_or_else(|| city.to_string())
    }

    pub fn normalize_restaurant_type(&self, kind: &str) -> String {
        self.restaurant_types
            .get(kind)
            .cloned()
            .unwrap_or_else(|| kind.to_string())
    }

    /// Reduce a phone number to `ddd<sep>ddd<sep>dddd` with `/` as the first
    /// separator. Numbers without that shape are returned unchanged.
    pub fn normalize_phone(&self, phone: &str) -> String {
        let compact = phone.replace(' ', "");
        let Some(caps) = self.phone.captures(&compact) else {
            return phone.to_string();
        };
        if &caps[2] == PHONE_SEPARATOR_FROM {
            format!("{}{}{}{}{}", &caps[1], PHONE_SEPARATOR_TO, &caps[3], &caps[4], &caps[5])
        } else {
            caps[0].to_string()
        }
    }

    /// Separator between the first two digit groups, if the phone has the
    /// recognized shape.
    fn phone_separator(&self, phone: &str) -> Option<String> {
        let compact = phone.replace(' ', "");
        self.phone.captures(&compact).map(|caps| caps[2].to_string())
    }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Number of values each rule rewrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub names: usize,
    pub streets: usize,
    pub cities: usize,
    pub restaurant_types: usize,
    pub phones: usize,
}

fn rewrite(field: &mut String, normalized: String, counter: &mut usize) {
    if *field != normalized {
        *field = normalized;
        *counter += 1;
    }
}

/// Normalize every record in place: name, street, city, type, phone.
pub fn audit_records(records: &mut [Record], rules: &AuditRules) -> AuditSummary {
    let mut summary = AuditSummary::default();

    for record in records.iter_mut() {
        let name = rules.normalize_name(&record.name);
        rewrite(&mut record.name, name, &mut summary.names);

        let address = rules.normalize_street(&record.address);
        rewrite(&mut record.address, address, &mut summary.streets);

        let city = rules.normalize_city(&record.city);
        rewrite(&mut record.city, city, &mut summary.cities);

        let kind = rules.normalize_restaurant_type(&record.kind);
        rewrite(&mut record.kind, kind, &mut summary.restaurant_types);

        let phone = rules.normalize_phone(&record.phone);
        rewrite(&mut record.phone, phone, &mut summary.phones);
    }

    log::info!(
        "audit: rewrote {} name(s), {} street(s), {} cit(ies), {} type(s), {} phone(s)",
        summary.names,
        summary.streets,
        summary.cities,
        summary.restaurant_types,
        summary.phones
    );
    summary
}

// ---------------------------------------------------------------------------
// Survey
// ---------------------------------------------------------------------------

/// What the rules would look at, before anything is rewritten.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurveyReport {
    /// Parenthesised name fragment -> names containing it.
    pub name_qualifiers: BTreeMap<String, BTreeSet<String>>,
    /// Trailing address token -> addresses ending with it.
    pub street_types: BTreeMap<String, BTreeSet<String>>,
    pub cities: BTreeMap<String, usize>,
    pub restaurant_types: BTreeMap<String, usize>,
    /// First phone separator -> count; `exception` for unrecognized numbers.
    pub phone_formats: BTreeMap<String, usize>,
}

pub fn survey_records(records: &[Record], rules: &AuditRules) -> SurveyReport {
    let mut report = SurveyReport::default();

    for record in records {
        if let Some(m) = rules.name_qualifier.find(&record.name) {
            report
                .name_qualifiers
                .entry(m.as_str().to_string())
                .or_default()
                .insert(record.name.clone());
        }

        if let Some(m) = rules.street_suffix.find(&record.address) {
            report
                .street_types
                .entry(m.as_str().to_string())
                .or_default()
                .insert(record.address.clone());
        }

        *report.cities.entry(record.city.clone()).or_insert(0) += 1;
        *report.restaurant_types.entry(record.kind.clone()).or_insert(0) += 1;

        let format = rules
            .phone_separator(&record.phone)
            .unwrap_or_else(|| "exception".to_string());
        *report.phone_formats.entry(format).or_insert(0) += 1;
    }

    report
}
