use serde::{Deserialize, Serialize};

use crate::normalize::{self, FieldKind};

macro_rules! canonical_record {
    ($($field:ident: $kind:ident),* $(,)?) => {
        /// Evolving structured record of one emergency call.
        ///
        /// Every field is a string in the vocabulary the dispatch sheet uses;
        /// the empty string means "not yet known". `codigo` rests at `"Verde"`
        /// instead.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct CanonicalRecord {
            $(pub $field: String,)*
        }

        impl Default for CanonicalRecord {
            fn default() -> Self {
                Self {
                    $($field: FieldKind::$kind.rest_value().to_string(),)*
                }
            }
        }

        impl CanonicalRecord {
            /// Schema fields in wire order, each paired with its
            /// normalization kind.
            pub const FIELDS: &'static [(&'static str, FieldKind)] = &[
                $((stringify!($field), FieldKind::$kind)),*
            ];

            /// Copy of this record with every field normalized for its kind.
            pub fn normalized(&self) -> Self {
                Self {
                    $($field: normalize::normalize_field(FieldKind::$kind, &self.$field),)*
                }
            }

            /// Fold `incoming` into this record field by field.
            ///
            /// A field only moves when the incoming value carries signal:
            /// empty strings never overwrite, and an incoming `"Verde"`
            /// leaves `codigo` alone. When both sides carry signal the
            /// incoming value wins.
            pub fn merge_from(&mut self, incoming: &Self) {
                $(
                    if FieldKind::$kind.is_signal(&incoming.$field) {
                        self.$field = incoming.$field.clone();
                    }
                )*
            }

            /// By-value convenience over [`Self::merge_from`].
            #[must_use]
            pub fn merged(mut self, incoming: &Self) -> Self {
                self.merge_from(incoming);
                self
            }

            /// Field name/value pairs that currently carry signal.
            pub fn filled_fields(&self) -> Vec<(&'static str, &str)> {
                let mut filled = Vec::new();
                $(
                    if FieldKind::$kind.is_signal(&self.$field) {
                        filled.push((stringify!($field), self.$field.as_str()));
                    }
                )*
                filled
            }
        }
    };
}

canonical_record! {
    nombre: Name,
    apellido: Name,
    sexo: Sexo,
    edad: Edad,
    direccion: Direccion,
    numero: Numero,
    comuna: Comuna,
    depto: Text,
    ubicacion_referencia: Text,
    ubicacion_detalle: Text,
    google_maps_url: Text,
    consciente: YesNo,
    respira: YesNo,
    avdi: Avdi,
    estado_respiratorio: Respiratorio,
    inicio_sintomas: Text,
    historia_clinica: Text,
    medicamentos: Text,
    alergias: Text,
    signos_vitales: Text,
    estado_basal: Text,
    let_dnr: Text,
    codigo: Codigo,
    motivo: Text,
    primera_persona: YesNo,
    seguro_salud: Text,
    aviso_conserjeria: Text,
    checklist_url: Text,
    medico_turno: Name,
    cantidad_rescatistas: Text,
    recursos_requeridos: Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_rest_values() {
        let record = CanonicalRecord::default();
        assert_eq!(record.codigo, "Verde");
        assert_eq!(record.nombre, "");
        assert_eq!(record.motivo, "");
        assert!(record.filled_fields().is_empty());
    }

    #[test]
    fn test_merge_empty_never_overwrites() {
        let mut existing = CanonicalRecord {
            nombre: "Juan".into(),
            edad: "45".into(),
            ..Default::default()
        };
        existing.merge_from(&CanonicalRecord::default());
        assert_eq!(existing.nombre, "Juan");
        assert_eq!(existing.edad, "45");
    }

    #[test]
    fn test_merge_incoming_signal_wins() {
        let existing = CanonicalRecord {
            nombre: "Juan".into(),
            comuna: "Providencia".into(),
            ..Default::default()
        };
        let incoming = CanonicalRecord {
            comuna: "Las Condes".into(),
            edad: "45".into(),
            ..Default::default()
        };
        let merged = existing.merged(&incoming);
        assert_eq!(merged.nombre, "Juan");
        assert_eq!(merged.comuna, "Las Condes");
        assert_eq!(merged.edad, "45");
    }

    #[test]
    fn test_merge_verde_carries_no_signal() {
        let mut existing = CanonicalRecord {
            codigo: "Rojo".into(),
            ..Default::default()
        };
        existing.merge_from(&CanonicalRecord::default());
        assert_eq!(existing.codigo, "Rojo");

        let downgrade = CanonicalRecord {
            codigo: "Amarillo".into(),
            ..Default::default()
        };
        existing.merge_from(&downgrade);
        assert_eq!(existing.codigo, "Amarillo");
    }

    #[test]
    fn test_merge_is_deterministic() {
        let a = CanonicalRecord {
            nombre: "Ana".into(),
            codigo: "Amarillo".into(),
            ..Default::default()
        };
        let b = CanonicalRecord {
            nombre: "María".into(),
            direccion: "Estoril".into(),
            ..Default::default()
        };
        assert_eq!(a.clone().merged(&b), a.clone().merged(&b));
        assert_eq!(a.clone().merged(&CanonicalRecord::default()), a);
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let record: CanonicalRecord =
            serde_json::from_str(r#"{"nombre": "Ana", "ignorado": 1}"#).unwrap();
        assert_eq!(record.nombre, "Ana");
        assert_eq!(record.apellido, "");
        assert_eq!(record.codigo, "Verde");
    }

    #[test]
    fn test_normalized() {
        let raw = CanonicalRecord {
            nombre: "juan pablo".into(),
            sexo: "masculino".into(),
            edad: "45 años".into(),
            consciente: "Sí".into(),
            codigo: "código rojo".into(),
            direccion: "Estoril 120 ayuda".into(),
            numero: "nº 120".into(),
            avdi: "despierto".into(),
            ..Default::default()
        };
        let normalized = raw.normalized();
        assert_eq!(normalized.nombre, "Juan Pablo");
        assert_eq!(normalized.sexo, "M");
        assert_eq!(normalized.edad, "45");
        assert_eq!(normalized.consciente, "si");
        assert_eq!(normalized.codigo, "Rojo");
        assert_eq!(normalized.direccion, "Estoril 120");
        assert_eq!(normalized.numero, "120");
        assert_eq!(normalized.avdi, "");
    }

    #[test]
    fn test_field_table_matches_struct() {
        assert_eq!(CanonicalRecord::FIELDS.len(), 31);
        assert_eq!(CanonicalRecord::FIELDS[0].0, "nombre");
        assert!(
            CanonicalRecord::FIELDS
                .iter()
                .any(|(field, kind)| *field == "codigo" && *kind == FieldKind::Codigo)
        );
    }
}
