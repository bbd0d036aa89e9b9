use tiqn_canonical::CanonicalRecord;

pub(crate) const SYSTEM_PROMPT: &str = r#"Eres un operador experto de tiqn. Debes completar la ficha SOS y los campos de seguimiento de una emergencia a partir de la transcripción.

IMPORTANTE: Esta transcripción puede ser INCREMENTAL (solo un fragmento nuevo de una llamada en curso). Tu tarea es extraer SOLO la información nueva que aparece en este fragmento específico.

Reglas estrictas:
1. Extrae ÚNICAMENTE datos que se mencionan EXPLÍCITAMENTE en este fragmento
2. Si no existe información confirmada, deja el campo como cadena vacía ""
3. NO escribas "desconocido", "n/a" ni equivalentes - usa cadenas vacías ""
4. Si en este fragmento no aparece ningún dato nuevo, devuelve todas las cadenas vacías
5. Usa español de Chile

Campos específicos:
- direccion: solo nombre de calle (sin "emergencia", "ayuda", etc.)
- numero: solo dígitos
- comuna: nombre formal de la comuna
- depto: referencias como "oficina 111", "departamento 502"
- ubicacion_detalle: detalles del lugar ("gimnasio edificio", "cancha fútbol")
- avdi: exactamente "alerta", "verbal", "dolor" o "inconsciente" (o "" si no se menciona)
- estado_respiratorio: "respira" o "no respira" (o "" si no se menciona)
- consciente/respira: "si" o "no" (o "" si no se menciona)
- codigo: "Verde", "Amarillo" o "Rojo"
- inicio_sintomas: expresiones como "súbito", "hace 2 horas" (o "" si no se menciona)
- cantidad_rescatistas/recursos_requeridos: solo si se solicitan explícitamente
- campos médicos (historia_clinica, medicamentos, alergias, etc.): solo si se mencionan

Devuelve SOLO JSON plano, sin markdown."#;

const RESPONSE_SCHEMA: &str = r#"{
  "nombre": "",
  "apellido": "",
  "direccion": "",
  "numero": "",
  "comuna": "",
  "depto": "",
  "ubicacion_referencia": "",
  "ubicacion_detalle": "",
  "google_maps_url": "",
  "codigo": "Verde",
  "sexo": "",
  "edad": "",
  "avdi": "",
  "estado_respiratorio": "",
  "consciente": "",
  "respira": "",
  "motivo": "",
  "inicio_sintomas": "",
  "cantidad_rescatistas": "",
  "recursos_requeridos": "",
  "estado_basal": "",
  "let_dnr": "",
  "historia_clinica": "",
  "medicamentos": "",
  "alergias": "",
  "seguro_salud": "",
  "aviso_conserjeria": "",
  "signos_vitales": "",
  "checklist_url": "",
  "medico_turno": ""
}"#;

/// Render the user turn: fragment text, the fields already known from
/// earlier fragments, and the exact response schema.
pub(crate) fn build_user_prompt(chunk_text: &str, current: &CanonicalRecord) -> String {
    let mut context = String::new();
    let filled = current.filled_fields();
    if !filled.is_empty() {
        let map: serde_json::Map<String, serde_json::Value> = filled
            .iter()
            .map(|(field, value)| (field.to_string(), serde_json::Value::from(*value)))
            .collect();
        let rendered = serde_json::to_string_pretty(&map).unwrap_or_default();
        context = format!("\n\nDatos ya extraídos en fragmentos anteriores:\n{rendered}\n");
    }

    format!(
        "Fragmento de transcripción (es-CL):{context}\n\nTranscripción actual:\n{chunk_text}\n\nExtrae SOLO la información nueva de este fragmento y devuelve JSON con este esquema exacto:\n{RESPONSE_SCHEMA}\n\nRecuerda: si no hay información nueva en este fragmento, devuelve todas las cadenas vacías."
    )
}

/// Pull a record out of the model's reply.
///
/// The reply is supposed to be bare JSON, but fenced or prose-wrapped
/// replies still happen. Fence markers are dropped and the outermost
/// `{...}` window is parsed; anything else is `None`.
pub(crate) fn parse_record(raw: &str) -> Option<CanonicalRecord> {
    let stripped = raw.replace("```json", "").replace("```", "");
    let first = stripped.find('{')?;
    let last = stripped.rfind('}')?;
    if last < first {
        return None;
    }
    serde_json::from_str(&stripped[first..=last]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_without_context() {
        let prompt = build_user_prompt("se desmayó mi esposo", &CanonicalRecord::default());

        assert!(prompt.starts_with("Fragmento de transcripción (es-CL):\n\n"));
        assert!(!prompt.contains("Datos ya extraídos"));
        assert!(prompt.contains("se desmayó mi esposo"));
        assert!(prompt.contains(r#""codigo": "Verde""#));
        assert!(prompt.contains(r#""medico_turno": """#));
    }

    #[test]
    fn test_user_prompt_lists_known_fields() {
        let current = CanonicalRecord {
            nombre: "Juan".into(),
            comuna: "Las Condes".into(),
            ..Default::default()
        };
        let prompt = build_user_prompt("sigue sin responder", &current);

        assert!(prompt.contains("Datos ya extraídos en fragmentos anteriores:"));
        assert!(prompt.contains(r#""nombre": "Juan""#));
        assert!(prompt.contains(r#""comuna": "Las Condes""#));
    }

    #[test]
    fn test_user_prompt_context_skips_resting_codigo() {
        let current = CanonicalRecord {
            edad: "78".into(),
            ..Default::default()
        };
        let prompt = build_user_prompt("hola", &current);

        let context = prompt
            .split("Transcripción actual:")
            .next()
            .unwrap_or_default();
        assert!(context.contains(r#""edad": "78""#));
        assert!(!context.contains("codigo"));
    }

    #[test]
    fn test_parse_record_bare_json() {
        let record = parse_record(r#"{"nombre": "ana", "codigo": "Rojo"}"#).unwrap();
        assert_eq!(record.nombre, "ana");
        assert_eq!(record.codigo, "Rojo");
        assert_eq!(record.apellido, "");
    }

    #[test]
    fn test_parse_record_fenced_json() {
        let raw = "```json\n{\"nombre\": \"ana\"}\n```";
        let record = parse_record(raw).unwrap();
        assert_eq!(record.nombre, "ana");
    }

    #[test]
    fn test_parse_record_prose_wrapped() {
        let raw = "Aquí está la información extraída:\n{\"edad\": \"78\"}\nEso es todo.";
        let record = parse_record(raw).unwrap();
        assert_eq!(record.edad, "78");
    }

    #[test]
    fn test_parse_record_rejects_garbage() {
        assert!(parse_record("no pude extraer nada").is_none());
        assert!(parse_record("").is_none());
        assert!(parse_record(r#"{"nombre": "ana""#).is_none());
        assert!(parse_record("} {").is_none());
    }
}
