/// Triage color of an incident. A call starts at `Verde`, so the merge treats
/// an incoming `Verde` as "no signal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
pub enum TriageCode {
    #[default]
    #[strum(to_string = "Verde", serialize = "verde")]
    Verde,
    #[strum(to_string = "Amarillo", serialize = "amarillo")]
    Amarillo,
    #[strum(to_string = "Rojo", serialize = "rojo")]
    Rojo,
}

impl TriageCode {
    /// Lowercase keyword used for contains-matching inside free text.
    pub fn keyword(self) -> &'static str {
        match self {
            TriageCode::Verde => "verde",
            TriageCode::Amarillo => "amarillo",
            TriageCode::Rojo => "rojo",
        }
    }
}

/// si/no vocabulary shared by the status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum YesNo {
    #[strum(to_string = "si", serialize = "sí")]
    Si,
    #[strum(serialize = "no")]
    No,
}

/// AVDI consciousness scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum AvdiLevel {
    #[strum(serialize = "alerta")]
    Alerta,
    #[strum(serialize = "verbal")]
    Verbal,
    #[strum(serialize = "dolor")]
    Dolor,
    #[strum(serialize = "inconsciente")]
    Inconsciente,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum Sex {
    #[strum(to_string = "M", serialize = "m", serialize = "masculino")]
    Male,
    #[strum(to_string = "F", serialize = "f", serialize = "femenino")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum RespiratoryState {
    #[strum(serialize = "respira")]
    Respira,
    #[strum(to_string = "no respira")]
    NoRespira,
}
