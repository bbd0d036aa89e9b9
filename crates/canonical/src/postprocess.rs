use std::sync::LazyLock;

use regex::Regex;

use crate::comunas;
use crate::normalize::{self, FieldKind, WHITESPACE_RE};
use crate::record::CanonicalRecord;
use crate::vocab::{AvdiLevel, RespiratoryState, Sex, TriageCode, YesNo};

const MOTIVO_MAX_CHARS: usize = 500;

static FIRST_PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(soy|estoy|necesito|me\s+llamo|hablo|vivo|puedo|llamando)\b").unwrap()
});

static SEXO_F_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(señora|mujer|femenina|niña)\b").unwrap());

static SEXO_M_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(señor|hombre|masculino|niño)\b").unwrap());

static EDAD_TRANSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,3})\s*(?:años|año)").unwrap());

static CODIGO_ROJO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(paro|inconsciente|no\s+respira|convulsi)").unwrap());

static CODIGO_AMARILLO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(dolor\s+fuerte|accidente|fractura|desmayo)").unwrap());

static AVDI_ALERTA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(alerta|consciente|orientado)").unwrap());

static AVDI_VERBAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"responde\s+a\s+la?\s*voz").unwrap());

static AVDI_DOLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"responde\s*a\s+dolor").unwrap());

static AVDI_INCONSCIENTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(inconsciente|no\s+responde)").unwrap());

static RESP_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"no\s+respira|paro").unwrap());

static RESP_SI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brespira").unwrap());

static ADDRESS_TRIGGER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:vivo en|estoy en|estamos en|la dirección es|mi direccion es|nos encontramos en|ubicado en)\s+([^\.\!\?]+)",
    )
    .unwrap()
});

static ADDRESS_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-zÁÉÍÓÚÑáéíóúñ' ]+?)\s*(\d{1,6})(?:\s*((?:oficina|departamento|depto|piso)\s*[A-Za-z0-9-]+))?(?:\s*(?:,|en\s+la\s+comuna\s+de|comuna)\s*([A-Za-zÁÉÍÓÚÑáéíóúñ' ]+))?",
    )
    .unwrap()
});

/// Fill record gaps the extractor left behind, using the transcript chunk the
/// record was just merged from.
///
/// Every write either fills an empty field or recomputes a value that is a
/// pure function of other fields; a set field is never cleared.
pub fn post_process(record: &mut CanonicalRecord, transcript: &str) {
    let lower = transcript.to_lowercase();

    if record.sexo.is_empty() {
        record.sexo = infer_sexo(transcript);
    }
    if record.edad.is_empty() {
        record.edad = infer_edad(transcript);
    }
    if !FieldKind::Codigo.is_signal(&record.codigo) {
        record.codigo = infer_codigo(&lower);
    }
    if record.avdi.is_empty() {
        record.avdi = infer_avdi(&lower, &record.consciente);
    }
    if record.estado_respiratorio.is_empty() {
        record.estado_respiratorio = infer_respiratorio(&lower, &record.respira);
    }

    if comunas::is_region_placeholder(&record.comuna)
        && let Some(hint) = comunas::comuna_for_street(&record.direccion)
    {
        record.comuna = hint.to_string();
    }

    if (record.direccion.is_empty() || record.numero.is_empty())
        && let Some(parts) = extract_address(transcript)
    {
        if record.direccion.is_empty() && !parts.direccion.is_empty() {
            record.direccion = normalize::direccion(&parts.direccion);
        }
        if record.numero.is_empty() && !parts.numero.is_empty() {
            record.numero = normalize::numero(&parts.numero);
        }
        if record.comuna.is_empty() && !parts.comuna.is_empty() {
            record.comuna = normalize::comuna(&parts.comuna);
        }
        if record.depto.is_empty() && !parts.depto.is_empty() {
            record.depto = parts.depto;
        }
    }

    if !record.direccion.is_empty() || !record.numero.is_empty() || !record.comuna.is_empty() {
        record.google_maps_url =
            maps_search_url(&record.direccion, &record.numero, &record.comuna);
    }

    if is_first_person(transcript) {
        if record.primera_persona.is_empty() {
            record.primera_persona = YesNo::Si.to_string();
        }
        // A caller speaking for themselves is conscious and breathing unless
        // the chunk says otherwise.
        if record.consciente.is_empty() && !lower.contains("inconsciente") {
            record.consciente = YesNo::Si.to_string();
        }
        if record.respira.is_empty() && !lower.contains("no respira") {
            record.respira = YesNo::Si.to_string();
        }
    }

    if record.motivo.is_empty() {
        record.motivo = transcript.chars().take(MOTIVO_MAX_CHARS).collect();
    }
}

/// Whether the caller speaks in first person, meaning the caller is likely
/// the patient.
pub fn is_first_person(text: &str) -> bool {
    FIRST_PERSON_RE.is_match(text)
}

fn infer_sexo(transcript: &str) -> String {
    if SEXO_F_RE.is_match(transcript) {
        return Sex::Female.to_string();
    }
    if SEXO_M_RE.is_match(transcript) {
        return Sex::Male.to_string();
    }
    String::new()
}

fn infer_edad(transcript: &str) -> String {
    EDAD_TRANSCRIPT_RE
        .captures(transcript)
        .and_then(|caps| caps.get(1))
        .and_then(|m| normalize::parse_age(m.as_str()))
        .map(|age| age.to_string())
        .unwrap_or_default()
}

fn infer_codigo(lower: &str) -> String {
    if CODIGO_ROJO_RE.is_match(lower) {
        TriageCode::Rojo.to_string()
    } else if CODIGO_AMARILLO_RE.is_match(lower) {
        TriageCode::Amarillo.to_string()
    } else {
        TriageCode::Verde.to_string()
    }
}

fn infer_avdi(lower: &str, consciente: &str) -> String {
    if AVDI_ALERTA_RE.is_match(lower) {
        return AvdiLevel::Alerta.to_string();
    }
    if AVDI_VERBAL_RE.is_match(lower) {
        return AvdiLevel::Verbal.to_string();
    }
    if AVDI_DOLOR_RE.is_match(lower) {
        return AvdiLevel::Dolor.to_string();
    }
    if AVDI_INCONSCIENTE_RE.is_match(lower) {
        return AvdiLevel::Inconsciente.to_string();
    }
    match normalize::yes_no(consciente).parse::<YesNo>() {
        Ok(YesNo::Si) => AvdiLevel::Alerta.to_string(),
        Ok(YesNo::No) => AvdiLevel::Inconsciente.to_string(),
        Err(_) => String::new(),
    }
}

fn infer_respiratorio(lower: &str, respira: &str) -> String {
    match normalize::yes_no(respira).parse::<YesNo>() {
        Ok(YesNo::Si) => return RespiratoryState::Respira.to_string(),
        Ok(YesNo::No) => return RespiratoryState::NoRespira.to_string(),
        Err(_) => {}
    }
    if RESP_NO_RE.is_match(lower) {
        RespiratoryState::NoRespira.to_string()
    } else if RESP_SI_RE.is_match(lower) {
        RespiratoryState::Respira.to_string()
    } else {
        String::new()
    }
}

struct AddressParts {
    direccion: String,
    numero: String,
    depto: String,
    comuna: String,
}

fn extract_address(text: &str) -> Option<AddressParts> {
    let normalized = WHITESPACE_RE.replace_all(text, " ");
    let segment = ADDRESS_TRIGGER_RE.captures(&normalized)?.get(1)?.as_str();
    let caps = ADDRESS_DETAIL_RE.captures(segment)?;
    let part = |index: usize| {
        caps.get(index)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };
    Some(AddressParts {
        direccion: part(1),
        numero: part(2),
        depto: part(3),
        comuna: part(4),
    })
}

fn maps_search_url(direccion: &str, numero: &str, comuna: &str) -> String {
    let query = [direccion, numero, comuna, "Santiago, Chile"]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(&query)
    )
}
