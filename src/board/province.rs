//! Provinces, coasts and powers of the standard map.
//!
//! The province table is declared once through the `provinces!` macro, which
//! generates the `Province` enum (alphabetical by abbreviation), the
//! `ALL_PROVINCES` list and the `PROVINCE_INFO` metadata table indexed by the
//! enum discriminant.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The number of supply centers on the standard map.
pub const SUPPLY_CENTER_COUNT: usize = 34;

/// Static metadata for a province.
#[derive(Debug)]
pub struct ProvinceInfo {
    pub abbr: &'static str,
    pub name: &'static str,
    pub province_type: ProvinceType,
    pub is_supply_center: bool,
    pub home_power: Option<Power>,
    pub coasts: &'static [Coast],
}

macro_rules! provinces {
    (@center center) => { true };
    (@center plain) => { false };
    (@home -) => { None };
    (@home $power:ident) => { Some(Power::$power) };
    ($($variant:ident $abbr:literal, $name:literal, $kind:ident, $sc:ident, $home:tt, [$($coast:ident),*];)*) => {
        /// A province of the standard map.
        ///
        /// Variants are ordered alphabetically by abbreviation; the
        /// discriminant indexes `PROVINCE_INFO` and per-province arrays.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        #[repr(u8)]
        pub enum Province {
            $($variant),*
        }

        /// All provinces in index order.
        pub const ALL_PROVINCES: &[Province] = &[$(Province::$variant),*];

        /// Metadata table, indexed by `Province as usize`.
        pub static PROVINCE_INFO: &[ProvinceInfo] = &[$(
            ProvinceInfo {
                abbr: $abbr,
                name: $name,
                province_type: ProvinceType::$kind,
                is_supply_center: provinces!(@center $sc),
                home_power: provinces!(@home $home),
                coasts: &[$(Coast::$coast),*],
            }
        ),*];
    };
}

provinces! {
    Adr "adr", "Adriatic Sea", Sea, plain, -, [];
    Aeg "aeg", "Aegean Sea", Sea, plain, -, [];
    Alb "alb", "Albania", Coastal, plain, -, [];
    Ank "ank", "Ankara", Coastal, center, Turkey, [];
    Apu "apu", "Apulia", Coastal, plain, -, [];
    Arm "arm", "Armenia", Coastal, plain, -, [];
    Bal "bal", "Baltic Sea", Sea, plain, -, [];
    Bar "bar", "Barents Sea", Sea, plain, -, [];
    Bel "bel", "Belgium", Coastal, center, -, [];
    Ber "ber", "Berlin", Coastal, center, Germany, [];
    Bla "bla", "Black Sea", Sea, plain, -, [];
    Boh "boh", "Bohemia", Land, plain, -, [];
    Bot "bot", "Gulf of Bothnia", Sea, plain, -, [];
    Bre "bre", "Brest", Coastal, center, France, [];
    Bud "bud", "Budapest", Land, center, Austria, [];
    Bul "bul", "Bulgaria", Coastal, center, -, [East, South];
    Bur "bur", "Burgundy", Land, plain, -, [];
    Cly "cly", "Clyde", Coastal, plain, -, [];
    Con "con", "Constantinople", Coastal, center, Turkey, [];
    Den "den", "Denmark", Coastal, center, -, [];
    Eas "eas", "Eastern Mediterranean", Sea, plain, -, [];
    Edi "edi", "Edinburgh", Coastal, center, England, [];
    Eng "eng", "English Channel", Sea, plain, -, [];
    Fin "fin", "Finland", Coastal, plain, -, [];
    Gal "gal", "Galicia", Land, plain, -, [];
    Gas "gas", "Gascony", Coastal, plain, -, [];
    Gol "gol", "Gulf of Lyon", Sea, plain, -, [];
    Gre "gre", "Greece", Coastal, center, -, [];
    Hel "hel", "Heligoland Bight", Sea, plain, -, [];
    Hol "hol", "Holland", Coastal, center, -, [];
    Ion "ion", "Ionian Sea", Sea, plain, -, [];
    Iri "iri", "Irish Sea", Sea, plain, -, [];
    Kie "kie", "Kiel", Coastal, center, Germany, [];
    Lon "lon", "London", Coastal, center, England, [];
    Lvn "lvn", "Livonia", Coastal, plain, -, [];
    Lvp "lvp", "Liverpool", Coastal, center, England, [];
    Mao "mao", "Mid-Atlantic Ocean", Sea, plain, -, [];
    Mar "mar", "Marseilles", Coastal, center, France, [];
    Mos "mos", "Moscow", Land, center, Russia, [];
    Mun "mun", "Munich", Land, center, Germany, [];
    Naf "naf", "North Africa", Coastal, plain, -, [];
    Nao "nao", "North Atlantic Ocean", Sea, plain, -, [];
    Nap "nap", "Naples", Coastal, center, Italy, [];
    Nrg "nrg", "Norwegian Sea", Sea, plain, -, [];
    Nth "nth", "North Sea", Sea, plain, -, [];
    Nwy "nwy", "Norway", Coastal, center, -, [];
    Par "par", "Paris", Land, center, France, [];
    Pic "pic", "Picardy", Coastal, plain, -, [];
    Pie "pie", "Piedmont", Coastal, plain, -, [];
    Por "por", "Portugal", Coastal, center, -, [];
    Pru "pru", "Prussia", Coastal, plain, -, [];
    Rom "rom", "Rome", Coastal, center, Italy, [];
    Ruh "ruh", "Ruhr", Land, plain, -, [];
    Rum "rum", "Rumania", Coastal, center, -, [];
    Ser "ser", "Serbia", Land, center, -, [];
    Sev "sev", "Sevastopol", Coastal, center, Russia, [];
    Sil "sil", "Silesia", Land, plain, -, [];
    Ska "ska", "Skagerrak", Sea, plain, -, [];
    Smy "smy", "Smyrna", Coastal, center, Turkey, [];
    Spa "spa", "Spain", Coastal, center, -, [North, South];
    Stp "stp", "St. Petersburg", Coastal, center, Russia, [North, South];
    Swe "swe", "Sweden", Coastal, center, -, [];
    Syr "syr", "Syria", Coastal, plain, -, [];
    Tri "tri", "Trieste", Coastal, center, Austria, [];
    Tun "tun", "Tunisia", Coastal, center, -, [];
    Tus "tus", "Tuscany", Coastal, plain, -, [];
    Tyr "tyr", "Tyrolia", Land, plain, -, [];
    Tys "tys", "Tyrrhenian Sea", Sea, plain, -, [];
    Ukr "ukr", "Ukraine", Land, plain, -, [];
    Ven "ven", "Venice", Coastal, center, Italy, [];
    Vie "vie", "Vienna", Land, center, Austria, [];
    Wal "wal", "Wales", Coastal, plain, -, [];
    War "war", "Warsaw", Land, center, Russia, [];
    Wes "wes", "Western Mediterranean", Sea, plain, -, [];
    Yor "yor", "Yorkshire", Coastal, plain, -, [];
}

/// The number of provinces on the standard map.
pub const PROVINCE_COUNT: usize = ALL_PROVINCES.len();

impl Province {
    fn info(self) -> &'static ProvinceInfo {
        &PROVINCE_INFO[self as usize]
    }

    /// Returns the 3-letter abbreviation.
    pub fn abbr(self) -> &'static str {
        self.info().abbr
    }

    /// Returns the full display name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn province_type(self) -> ProvinceType {
        self.info().province_type
    }

    pub fn is_supply_center(self) -> bool {
        self.info().is_supply_center
    }

    /// Returns the power whose home center this is, if any.
    pub fn home_power(self) -> Option<Power> {
        self.info().home_power
    }

    /// Returns the coasts of a split-coast province, empty otherwise.
    pub fn coasts(self) -> &'static [Coast] {
        self.info().coasts
    }

    /// Returns true if this province has split coasts.
    pub fn has_coasts(self) -> bool {
        !self.coasts().is_empty()
    }

    /// True if an army may stand here.
    pub fn is_land(self) -> bool {
        self.province_type() != ProvinceType::Sea
    }

    /// True if a fleet may stand here.
    pub fn is_navigable(self) -> bool {
        self.province_type() != ProvinceType::Land
    }

    /// Looks up a province by its 3-letter abbreviation.
    pub fn from_abbr(abbr: &str) -> Option<Province> {
        ALL_PROVINCES.iter().copied().find(|p| p.abbr() == abbr)
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

/// Coast specifier for split-coast provinces.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Coast {
    #[default]
    None,
    North,
    South,
    East,
}

impl Coast {
    /// Returns the 2-letter abbreviation (empty string for None).
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    /// Parses a coast from its 2-letter abbreviation.
    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s {
            "" => Some(Coast::None),
            "nc" => Some(Coast::North),
            "sc" => Some(Coast::South),
            "ec" => Some(Coast::East),
            _ => Option::None,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Coast::None
    }
}

/// Classifies a province by terrain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvinceType {
    Land,
    Sea,
    Coastal,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Returns the lowercase full name of this power.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "austria",
            Power::England => "england",
            Power::France => "france",
            Power::Germany => "germany",
            Power::Italy => "italy",
            Power::Russia => "russia",
            Power::Turkey => "turkey",
        }
    }

    /// Parses a power from its lowercase full name.
    pub fn from_name(name: &str) -> Option<Power> {
        ALL_POWERS.iter().copied().find(|p| p.name() == name)
    }

    /// Home supply centers of this power, in province order.
    pub fn home_centers(self) -> impl Iterator<Item = Province> {
        ALL_PROVINCES
            .iter()
            .copied()
            .filter(move |p| p.is_supply_center() && p.home_power() == Some(self))
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
