//! Column auto-detection and row normalization for guest-list uploads.
//!
//! Detection is a suggestion only: the caller shows it to the host, who may
//! override it with an explicit [`ColumnMapping`] before anything is stored.

use serde::{Deserialize, Serialize};

use crate::domain::models::guest::{Guest, GuestDetails};
use crate::domain::models::workbook::Sheet;
use crate::error::AppError;

// Candidate spellings, already in normalized form, in priority order.
const NAME_CANDIDATES: &[&str] = &[
    "name", "nome", "guest", "convidado", "fullname", "nomecompleto", "guestname", "nombre", "invitado",
];
const EMAIL_CANDIDATES: &[&str] = &[
    "email", "mail", "correo", "correio", "emailaddress", "correioeletronico",
];
const PHONE_CANDIDATES: &[&str] = &[
    "phone", "telefone", "tel", "mobile", "telemovel", "telemóvel", "telefono", "teléfono",
    "celular", "phonenumber", "contacto", "whatsapp",
];
const DIETARY_CANDIDATES: &[&str] = &[
    "dietary", "diet", "dieta", "dietaryrestrictions", "restricoes", "restrições",
    "restricoesalimentares", "restriçõesalimentares", "alergias", "allergies",
];
const PLUS_ONE_CANDIDATES: &[&str] = &[
    "plusone", "plus1", "+1", "acompanhante", "companion", "guestplusone", "comacompanhante",
];

const TRUTHY: &[&str] = &["yes", "sim", "1", "true", "y", "s"];

/// Which source header feeds each guest field. `None` leaves the field unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary: Option<String>,
    pub plus_one: Option<String>,
}

impl ColumnMapping {
    fn headers(&self) -> impl Iterator<Item = &String> {
        [&self.name, &self.email, &self.phone, &self.dietary, &self.plus_one]
            .into_iter()
            .flatten()
    }

    /// An explicit mapping may only name headers the sheet actually has.
    pub fn validate_against(&self, sheet: &Sheet) -> Result<(), AppError> {
        for header in self.headers() {
            if sheet.column_index(header).is_none() {
                return Err(AppError::Validation(format!(
                    "Column '{}' does not exist in sheet '{}'",
                    header, sheet.name
                )));
            }
        }
        Ok(())
    }
}

/// Lower-cases and drops whitespace, `_`, `-` and `.` so "E-mail" and "e_mail" compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-' | '.'))
        .collect()
}

fn detect_field(headers: &[String], candidates: &[&str], taken: &[String]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .filter(|h| !taken.contains(h))
            .find(|h| normalize_header(h) == *candidate)
            .cloned()
    })
}

/// First header matching a candidate, in candidate order, wins. No further guessing.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
    let mut taken: Vec<String> = Vec::new();
    let mut pick = |candidates: &[&str]| {
        let found = detect_field(headers, candidates, &taken);
        if let Some(h) = &found {
            taken.push(h.clone());
        }
        found
    };

    ColumnMapping {
        name: pick(NAME_CANDIDATES),
        email: pick(EMAIL_CANDIDATES),
        phone: pick(PHONE_CANDIDATES),
        dietary: pick(DIETARY_CANDIDATES),
        plus_one: pick(PLUS_ONE_CANDIDATES),
    }
}

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY.contains(&value.as_str())
}

/// Trims; blank becomes `None`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `None` when the name is blank after trimming.
pub fn guest_details(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    dietary: Option<&str>,
    plus_one: bool,
) -> Option<GuestDetails> {
    let name = non_empty(name)?;
    Some(GuestDetails {
        name,
        email: non_empty(email),
        phone: non_empty(phone),
        dietary: non_empty(dietary),
        plus_one,
    })
}

#[derive(Debug)]
pub struct NormalizedRows {
    pub guests: Vec<Guest>,
    pub skipped: usize,
}

pub fn normalize_rows(sheet: &Sheet, mapping: &ColumnMapping, event_id: &str) -> NormalizedRows {
    let mut guests = Vec::with_capacity(sheet.rows.len());
    let mut skipped = 0;

    let field = |row: &[String], header: &Option<String>| -> Option<String> {
        header.as_deref().and_then(|h| sheet.cell(row, h)).map(str::to_string)
    };

    for row in &sheet.rows {
        let plus_one = field(row, &mapping.plus_one)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let details = guest_details(
            field(row, &mapping.name).as_deref(),
            field(row, &mapping.email).as_deref(),
            field(row, &mapping.phone).as_deref(),
            field(row, &mapping.dietary).as_deref(),
            plus_one,
        );

        match details {
            Some(details) => guests.push(details.into_guest(event_id.to_string())),
            None => skipped += 1,
        }
    }

    NormalizedRows { guests, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::guest::RsvpStatus;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" E-Mail "), "email");
        assert_eq!(normalize_header("Full_Name"), "fullname");
        assert_eq!(normalize_header("Plus.One"), "plusone");
        assert_eq!(normalize_header("Telemóvel"), "telemóvel");
    }

    #[test]
    fn test_detects_portuguese_headers() {
        let mapping = detect_columns(&s(&["Nome", "Telefone"]));
        assert_eq!(mapping.name.as_deref(), Some("Nome"));
        assert_eq!(mapping.phone.as_deref(), Some("Telefone"));
        assert_eq!(mapping.email, None);
        assert_eq!(mapping.dietary, None);
        assert_eq!(mapping.plus_one, None);
    }

    #[test]
    fn test_detection_follows_candidate_order() {
        // "name" outranks "guest" even though "Guest" comes first in the file.
        let mapping = detect_columns(&s(&["Guest", "Name", "E_mail", "Acompanhante", "Dieta"]));
        assert_eq!(mapping.name.as_deref(), Some("Name"));
        assert_eq!(mapping.email.as_deref(), Some("E_mail"));
        assert_eq!(mapping.plus_one.as_deref(), Some("Acompanhante"));
        assert_eq!(mapping.dietary.as_deref(), Some("Dieta"));
    }

    #[test]
    fn test_first_matching_header_wins_for_same_candidate() {
        let mapping = detect_columns(&s(&["name", "Name "]));
        assert_eq!(mapping.name.as_deref(), Some("name"));
    }

    #[test]
    fn test_unrecognized_headers_stay_unmapped() {
        assert_eq!(detect_columns(&s(&["Col A", "Col B"])), ColumnMapping::default());
    }

    #[test]
    fn test_truthy_tokens() {
        for v in ["yes", "SIM", " 1 ", "True", "y", "S"] {
            assert!(is_truthy(v), "{} should be truthy", v);
        }
        for v in ["no", "nao", "0", "", "2", "x", "yep"] {
            assert!(!is_truthy(v), "{} should be falsy", v);
        }
    }

    #[test]
    fn test_normalize_rows_trims_and_skips_blank_names() {
        let sheet = Sheet::new(
            "Convidados".into(),
            s(&["Nome", "Email", "Telefone", "+1"]),
            vec![
                s(&["  Maria Silva ", " maria@example.com ", "", "sim"]),
                s(&["   ", "ghost@example.com", "123", "yes"]),
                s(&["João", "", " 912 ", "não"]),
                s(&["", "", "", "1"]),
            ],
        );
        let mapping = detect_columns(&sheet.headers);
        let out = normalize_rows(&sheet, &mapping, "evt-1");

        assert_eq!(out.guests.len(), 2);
        assert_eq!(out.skipped, 2);

        let maria = &out.guests[0];
        assert_eq!(maria.name, "Maria Silva");
        assert_eq!(maria.email.as_deref(), Some("maria@example.com"));
        assert_eq!(maria.phone, None);
        assert!(maria.plus_one);
        assert_eq!(maria.event_id, "evt-1");
        assert_eq!(maria.status(), RsvpStatus::Pending);
        assert!(maria.responded_at.is_none());

        let joao = &out.guests[1];
        assert_eq!(joao.phone.as_deref(), Some("912"));
        assert!(!joao.plus_one);
        assert_ne!(maria.rsvp_token, joao.rsvp_token);
    }

    #[test]
    fn test_unmapped_name_skips_everything() {
        let sheet = Sheet::new("S".into(), s(&["Foo"]), vec![s(&["a"]), s(&["b"])]);
        let out = normalize_rows(&sheet, &ColumnMapping::default(), "evt-1");
        assert!(out.guests.is_empty());
        assert_eq!(out.skipped, 2);
    }

    #[test]
    fn test_explicit_mapping_must_reference_existing_headers() {
        let sheet = Sheet::new("S".into(), s(&["Who", "Contact"]), vec![]);
        let ok = ColumnMapping { name: Some("Who".into()), phone: Some("Contact".into()), ..Default::default() };
        assert!(ok.validate_against(&sheet).is_ok());

        let bad = ColumnMapping { name: Some("Name".into()), ..Default::default() };
        assert!(matches!(bad.validate_against(&sheet), Err(AppError::Validation(_))));
    }
}
