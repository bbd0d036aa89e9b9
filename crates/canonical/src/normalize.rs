use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::{AvdiLevel, RespiratoryState, Sex, TriageCode, YesNo};

pub(crate) static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,3}").unwrap());

static DIRECCION_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(ayuda|emergencia|me\s+desmayo|auxilio)\b").unwrap());

static DIRECCION_TRAILING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+y\s+(?:necesito|me|estoy|urgente).*$").unwrap());

static COMUNA_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(comuna\s+de|en\s+la\s+comuna\s+de)\b").unwrap());

static COMUNA_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(ayuda|emergencia|urgencia)\b").unwrap());

/// Normalization class of a canonical field.
///
/// Every field of the canonical record is tagged with one of these; the kind
/// decides how raw extracted text is cleaned and what the field's rest value
/// is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    YesNo,
    Sexo,
    Edad,
    Avdi,
    Respiratorio,
    Codigo,
    Direccion,
    Numero,
    Comuna,
    Text,
}

impl FieldKind {
    /// Value a field of this kind holds before anything has been extracted.
    pub fn rest_value(self) -> &'static str {
        match self {
            FieldKind::Codigo => "Verde",
            _ => "",
        }
    }

    /// Whether `value` carries information worth merging for this kind.
    pub fn is_signal(self, value: &str) -> bool {
        !value.is_empty() && value != self.rest_value()
    }
}

/// Normalize one raw field value according to its kind.
///
/// Returns an empty string when the input carries nothing usable, so a
/// garbage extraction degrades to "no value" instead of polluting the record.
pub fn normalize_field(kind: FieldKind, value: &str) -> String {
    match kind {
        FieldKind::Name => name(value),
        FieldKind::YesNo => yes_no(value),
        FieldKind::Sexo => sexo(value),
        FieldKind::Edad => edad(value),
        FieldKind::Avdi => avdi(value),
        FieldKind::Respiratorio => respiratorio(value),
        FieldKind::Codigo => codigo(value),
        FieldKind::Direccion => direccion(value),
        FieldKind::Numero => numero(value),
        FieldKind::Comuna => comuna(value),
        FieldKind::Text => text(value),
    }
}

pub fn text(value: &str) -> String {
    value.trim().to_string()
}

/// Title-case each word of a name.
pub fn name(value: &str) -> String {
    value
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Collapse the si/no synonyms the callers actually say.
pub fn yes_no(value: &str) -> String {
    let s = value.trim().to_lowercase();
    if let Ok(v) = s.parse::<YesNo>() {
        return v.to_string();
    }
    if s.contains("si") {
        return YesNo::Si.to_string();
    }
    if s.contains("no") {
        return YesNo::No.to_string();
    }
    // "inconsciente" before "consciente": the former contains the latter.
    if s.contains("inconsciente") {
        return YesNo::No.to_string();
    }
    if s.contains("consciente") {
        return YesNo::Si.to_string();
    }
    String::new()
}

pub fn sexo(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .parse::<Sex>()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// First run of up to three digits, accepted as an age between 0 and 120.
pub fn edad(value: &str) -> String {
    parse_age(value).map(|age| age.to_string()).unwrap_or_default()
}

pub(crate) fn parse_age(value: &str) -> Option<u32> {
    let age: u32 = AGE_RE.find(value)?.as_str().parse().ok()?;
    (age <= 120).then_some(age)
}

pub fn avdi(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .parse::<AvdiLevel>()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

pub fn respiratorio(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .parse::<RespiratoryState>()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

pub fn codigo(value: &str) -> String {
    let s = value.to_lowercase();
    [TriageCode::Rojo, TriageCode::Amarillo, TriageCode::Verde]
        .into_iter()
        .find(|code| s.contains(code.keyword()))
        .map(|code| code.to_string())
        .unwrap_or_default()
}

/// Street name stripped of distress interjections and trailing pleas.
pub fn direccion(value: &str) -> String {
    let s = WHITESPACE_RE.replace_all(value.trim(), " ");
    let s = DIRECCION_NOISE_RE.replace_all(&s, "");
    let s = DIRECCION_TRAILING_RE.replace_all(&s, "");
    s.trim().to_string()
}

pub fn numero(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Comuna name without "comuna de" prefixes or region suffixes.
pub fn comuna(value: &str) -> String {
    let s = WHITESPACE_RE.replace_all(value.trim(), " ");
    let s = s.split(',').next().unwrap_or_default();
    let s = COMUNA_PREFIX_RE.replace_all(s, "");
    let s = COMUNA_NOISE_RE.replace_all(&s, "");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no() {
        let cases: &[(&str, &str)] = &[
            ("si", "si"),
            ("sí", "si"),
            ("Sí", "si"),
            ("NO", "no"),
            ("no responde", "no"),
            ("inconsciente", "no"),
            ("consciente", "si"),
            ("paciente consciente", "si"),
            ("tal vez", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(yes_no(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_sexo() {
        let cases: &[(&str, &str)] = &[
            ("M", "M"),
            ("m", "M"),
            ("masculino", "M"),
            ("F", "F"),
            ("Femenino", "F"),
            ("masculina", ""),
            ("x", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(sexo(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_edad() {
        let cases: &[(&str, &str)] = &[
            ("45", "45"),
            ("045", "45"),
            ("8", "8"),
            ("120", "120"),
            ("121", ""),
            ("edad 33", "33"),
            ("1234", ""),
            ("no sé", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(edad(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_codigo() {
        let cases: &[(&str, &str)] = &[
            ("rojo", "Rojo"),
            ("Código Rojo", "Rojo"),
            ("amarillo", "Amarillo"),
            ("VERDE", "Verde"),
            ("azul", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(codigo(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_avdi_and_respiratorio() {
        let cases: &[(&str, &str)] = &[
            ("alerta", "alerta"),
            ("Verbal", "verbal"),
            ("DOLOR", "dolor"),
            ("inconsciente", "inconsciente"),
            ("despierto", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(avdi(input), *expected, "failed for {:?}", input);
        }

        assert_eq!(respiratorio("respira"), "respira");
        assert_eq!(respiratorio("No Respira"), "no respira");
        assert_eq!(respiratorio("agitado"), "");
    }

    #[test]
    fn test_numero() {
        let cases: &[(&str, &str)] = &[
            ("1234", "1234"),
            ("nº 1234", "1234"),
            ("12-34", "1234"),
            ("sin número", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(numero(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_direccion() {
        let cases: &[(&str, &str)] = &[
            ("Avenida Estoril 120 ayuda", "Avenida Estoril 120"),
            (" Calle  Merced\n430 ", "Calle Merced 430"),
            ("Apoquindo 3000 y necesito una ambulancia", "Apoquindo 3000"),
            ("auxilio", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(direccion(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_comuna() {
        let cases: &[(&str, &str)] = &[
            ("comuna de Las Condes", "Las Condes"),
            ("en la comuna de Macul", "Macul"),
            ("Ñuñoa, Región Metropolitana", "Ñuñoa"),
            ("Providencia", "Providencia"),
            ("urgencia", ""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(comuna(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_name() {
        let cases: &[(&str, &str)] = &[
            ("juan", "Juan"),
            ("juan pablo", "Juan Pablo"),
            ("MARÍA", "María"),
            (" pérez  soto ", "Pérez Soto"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(name(input), *expected, "failed for {:?}", input);
        }
    }

    #[test]
    fn test_rest_values() {
        assert_eq!(FieldKind::Codigo.rest_value(), "Verde");
        assert_eq!(FieldKind::Text.rest_value(), "");

        assert!(FieldKind::Codigo.is_signal("Rojo"));
        assert!(!FieldKind::Codigo.is_signal("Verde"));
        assert!(!FieldKind::Codigo.is_signal(""));
        assert!(FieldKind::Text.is_signal("algo"));
        assert!(!FieldKind::Text.is_signal(""));
    }

    #[test]
    fn test_normalize_field_dispatch() {
        assert_eq!(normalize_field(FieldKind::Name, "juan"), "Juan");
        assert_eq!(normalize_field(FieldKind::Sexo, "femenino"), "F");
        assert_eq!(normalize_field(FieldKind::Codigo, "verde"), "Verde");
        assert_eq!(normalize_field(FieldKind::Text, "  estable  "), "estable");
    }
}
