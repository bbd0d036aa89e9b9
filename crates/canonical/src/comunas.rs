use std::sync::LazyLock;

use regex::Regex;

/// Comuna names that only narrow the address down to the region, treated the
/// same as an unset comuna.
const REGION_PLACEHOLDERS: &[&str] = &["santiago", "región metropolitana", "rm"];

/// Street name patterns that pin a Santiago address to its comuna.
static STREET_COMUNA_HINTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bestoril\b", "Las Condes"),
        (r"\bapoquindo\b", "Las Condes"),
        (r"\bbilbao\b", "Las Condes"),
        (r"\blas\s+condes\b", "Las Condes"),
        (r"\bkennedy\b", "Las Condes"),
        (r"\bprovidencia\b", "Providencia"),
        (r"\blos\s+leones\b", "Providencia"),
        (r"\bprovidence\b", "Providencia"),
        (r"\balameda\b", "Santiago"),
        (r"\bmerced\b", "Santiago"),
        (r"\bsan\s+pablo\b", "Santiago"),
        (r"\ballamand\b", "Huechuraba"),
        (r"\bvitacura\b", "Vitacura"),
        (r"\bmanquehue\b", "Vitacura"),
        (r"\bmacul\b", "Macul"),
        (r"\bñuble\b", "Ñuñoa"),
        (r"\birarrazaval\b", "Ñuñoa"),
        (r"\bgrecia\b", "Ñuñoa"),
        (r"\bla\s+florida\b", "La Florida"),
        (r"\bgran avenida\b", "La Cisterna"),
    ]
    .into_iter()
    .map(|(pattern, comuna)| (Regex::new(&format!("(?i){pattern}")).unwrap(), comuna))
    .collect()
});

/// Comuna implied by a street name, when the street is distinctive enough to
/// appear in the hint table.
pub fn comuna_for_street(direccion: &str) -> Option<&'static str> {
    STREET_COMUNA_HINTS
        .iter()
        .find(|(pattern, _)| pattern.is_match(direccion))
        .map(|(_, comuna)| *comuna)
}

/// True when the comuna is unset or names the whole region instead of an
/// actual comuna.
pub fn is_region_placeholder(comuna: &str) -> bool {
    if comuna.is_empty() {
        return true;
    }
    REGION_PLACEHOLDERS.contains(&comuna.to_lowercase().as_str())
}
