mod comunas;
pub mod normalize;
mod postprocess;
mod record;
mod vocab;

pub use comunas::{comuna_for_street, is_region_placeholder};
pub use normalize::{FieldKind, normalize_field};
pub use postprocess::{is_first_person, post_process};
pub use record::CanonicalRecord;
pub use vocab::{AvdiLevel, RespiratoryState, Sex, TriageCode, YesNo};
