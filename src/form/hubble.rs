//! Hubble-type classification for galaxies

/// Galaxy morphology following the Hubble sequence.
///
/// Discriminants double as standard form ids in the [`FormCache`]
/// (`crate::form::FormCache`): the 16 standard forms are built in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GalaxyType {
    Irr = 0,
    S0,
    Sa,
    Sb,
    Sc,
    SBa,
    SBb,
    SBc,
    E0,
    E1,
    E2,
    E3,
    E4,
    E5,
    E6,
    E7,
}

pub const GALAXY_TYPE_COUNT: usize = 16;

const NAMES: [(&str, GalaxyType); GALAXY_TYPE_COUNT] = [
    ("Irr", GalaxyType::Irr),
    ("S0", GalaxyType::S0),
    ("Sa", GalaxyType::Sa),
    ("Sb", GalaxyType::Sb),
    ("Sc", GalaxyType::Sc),
    ("SBa", GalaxyType::SBa),
    ("SBb", GalaxyType::SBb),
    ("SBc", GalaxyType::SBc),
    ("E0", GalaxyType::E0),
    ("E1", GalaxyType::E1),
    ("E2", GalaxyType::E2),
    ("E3", GalaxyType::E3),
    ("E4", GalaxyType::E4),
    ("E5", GalaxyType::E5),
    ("E6", GalaxyType::E6),
    ("E7", GalaxyType::E7),
];

impl GalaxyType {
    /// Parse a Hubble-type code. Unknown or empty strings fall back to `Irr`.
    pub fn parse(s: &str) -> Self {
        NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|&(_, t)| t)
            .unwrap_or(GalaxyType::Irr)
    }

    pub fn name(self) -> &'static str {
        NAMES[self as usize].0
    }

    /// Standard form id for this type
    pub fn form_id(self) -> usize {
        self as usize
    }

    /// Disk galaxies with a dust lane (S0..SBc)
    pub fn is_spiral(self) -> bool {
        self > GalaxyType::Irr && self < GalaxyType::E0
    }

    pub fn is_elliptical(self) -> bool {
        self >= GalaxyType::E0
    }
}

impl std::fmt::Display for GalaxyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
