/// One of the five physical locations that accept kids enrolments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sede {
    SanIsidro,
    LaMolina,
    PuebloLibre,
    Brena,
    SanMiguel,
}

impl Sede {
    pub const ALL: [Sede; 5] = [
        Sede::SanIsidro,
        Sede::LaMolina,
        Sede::PuebloLibre,
        Sede::Brena,
        Sede::SanMiguel,
    ];

    /// Display name as submitted by the enrolment form.
    pub fn name(self) -> &'static str {
        match self {
            Sede::SanIsidro => "San Isidro",
            Sede::LaMolina => "La Molina",
            Sede::PuebloLibre => "Pueblo Libre",
            Sede::Brena => "Breña",
            Sede::SanMiguel => "San Miguel",
        }
    }

    /// Exact, case- and accent-sensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sede| sede.name() == name)
    }

    /// Environment variable holding the CC address for this location.
    pub fn cc_env_key(self) -> &'static str {
        match self {
            Sede::SanIsidro => "SEDE_SAN_ISIDRO_EMAIL",
            Sede::LaMolina => "SEDE_LA_MOLINA_EMAIL",
            Sede::PuebloLibre => "SEDE_PUEBLO_LIBRE_EMAIL",
            Sede::Brena => "SEDE_BRENA_EMAIL",
            Sede::SanMiguel => "SEDE_SAN_MIGUEL_EMAIL",
        }
    }
}
