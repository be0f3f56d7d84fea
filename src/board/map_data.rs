//! Border lists of the standard map.
//!
//! Each border is listed once; `BoardGraph::standard` adds both directions.

/// Borders shared by a coastline: passable by armies and fleets alike.
pub(crate) const COASTLINES: &[(&str, &str)] = &[
    ("alb", "gre"), ("alb", "tri"), ("ank", "arm"), ("ank", "con"), ("apu", "nap"),
    ("apu", "ven"), ("bel", "hol"), ("bel", "pic"), ("ber", "kie"), ("ber", "pru"),
    ("bre", "gas"), ("bre", "pic"), ("cly", "edi"), ("cly", "lvp"), ("con", "smy"),
    ("den", "kie"), ("den", "swe"), ("edi", "yor"), ("fin", "swe"), ("lon", "wal"),
    ("lon", "yor"), ("lvp", "wal"), ("mar", "pie"), ("naf", "tun"), ("nwy", "swe"),
    ("pie", "tus"), ("pru", "lvn"), ("rom", "nap"), ("rom", "tus"), ("sev", "arm"),
    ("sev", "rum"), ("smy", "syr"), ("tri", "ven"),
];

/// Borders crossable only over land.
pub(crate) const LAND_BORDERS: &[(&str, &str)] = &[
    ("boh", "gal"), ("boh", "mun"), ("boh", "sil"), ("boh", "tyr"), ("boh", "vie"),
    ("bud", "gal"), ("bud", "vie"), ("bur", "mun"), ("bur", "par"), ("bur", "ruh"),
    ("gal", "sil"), ("gal", "ukr"), ("gal", "vie"), ("gal", "war"), ("mos", "ukr"),
    ("mos", "war"), ("mun", "ruh"), ("mun", "sil"), ("mun", "tyr"), ("sil", "war"),
    ("tyr", "vie"), ("ukr", "war"), ("bud", "rum"), ("bud", "ser"), ("bud", "tri"),
    ("bur", "bel"), ("bur", "gas"), ("bur", "mar"), ("bur", "pic"), ("gal", "rum"),
    ("gas", "mar"), ("mos", "lvn"), ("mos", "sev"), ("mos", "stp"), ("mun", "ber"),
    ("mun", "kie"), ("par", "bre"), ("par", "gas"), ("par", "pic"), ("ruh", "bel"),
    ("ruh", "hol"), ("ruh", "kie"), ("ser", "alb"), ("ser", "bul"), ("ser", "gre"),
    ("ser", "rum"), ("ser", "tri"), ("sil", "ber"), ("sil", "pru"), ("tyr", "pie"),
    ("tyr", "tri"), ("tyr", "ven"), ("ukr", "rum"), ("ukr", "sev"), ("vie", "tri"),
    ("war", "lvn"), ("war", "pru"), ("edi", "lvp"), ("fin", "nwy"), ("pie", "ven"),
    ("rom", "ven"), ("smy", "arm"), ("wal", "yor"), ("con", "bul"), ("gre", "bul"),
    ("rum", "bul"), ("gas", "spa"), ("mar", "spa"), ("por", "spa"), ("fin", "stp"),
    ("lvn", "stp"), ("nwy", "stp"), ("ank", "smy"), ("apu", "rom"), ("lvp", "yor"),
    ("tus", "ven"), ("arm", "syr"),
];

/// Borders crossable only by sea. Split coasts are written `province/coast`.
pub(crate) const SEA_LANES: &[(&str, &str)] = &[
    ("adr", "ion"), ("aeg", "eas"), ("aeg", "ion"), ("bal", "bot"), ("eng", "iri"),
    ("eng", "mao"), ("eng", "nth"), ("gol", "tys"), ("gol", "wes"), ("hel", "nth"),
    ("ion", "eas"), ("ion", "tys"), ("iri", "mao"), ("iri", "nao"), ("mao", "nao"),
    ("mao", "wes"), ("nao", "nrg"), ("nth", "nrg"), ("nth", "ska"), ("nrg", "bar"),
    ("tys", "wes"), ("adr", "alb"), ("adr", "apu"), ("adr", "tri"), ("adr", "ven"),
    ("aeg", "bul/sc"), ("aeg", "con"), ("aeg", "gre"), ("aeg", "smy"), ("bal", "ber"),
    ("bal", "den"), ("bal", "kie"), ("bal", "lvn"), ("bal", "pru"), ("bal", "swe"),
    ("bar", "nwy"), ("bar", "stp/nc"), ("bla", "ank"), ("bla", "arm"), ("bla", "bul/ec"),
    ("bla", "con"), ("bla", "rum"), ("bla", "sev"), ("bot", "fin"), ("bot", "lvn"),
    ("bot", "stp/sc"), ("bot", "swe"), ("eas", "smy"), ("eas", "syr"), ("eng", "bel"),
    ("eng", "bre"), ("eng", "lon"), ("eng", "pic"), ("eng", "wal"), ("gol", "mar"),
    ("gol", "pie"), ("gol", "spa/sc"), ("gol", "tus"), ("hel", "den"), ("hel", "hol"),
    ("hel", "kie"), ("ion", "alb"), ("ion", "apu"), ("ion", "gre"), ("ion", "nap"),
    ("ion", "tun"), ("iri", "lvp"), ("iri", "wal"), ("mao", "bre"), ("mao", "gas"),
    ("mao", "naf"), ("mao", "por"), ("mao", "spa/nc"), ("mao", "spa/sc"), ("nao", "cly"),
    ("nao", "lvp"), ("nth", "bel"), ("nth", "den"), ("nth", "edi"), ("nth", "hol"),
    ("nth", "lon"), ("nth", "nwy"), ("nth", "yor"), ("nrg", "cly"), ("nrg", "edi"),
    ("nrg", "nwy"), ("ska", "den"), ("ska", "nwy"), ("ska", "swe"), ("tys", "nap"),
    ("tys", "rom"), ("tys", "tun"), ("tys", "tus"), ("wes", "naf"), ("wes", "spa/sc"),
    ("wes", "tun"), ("con", "bul/ec"), ("con", "bul/sc"), ("gre", "bul/sc"), ("rum", "bul/ec"),
    ("gas", "spa/nc"), ("mar", "spa/sc"), ("por", "spa/nc"), ("por", "spa/sc"),
    ("fin", "stp/sc"), ("lvn", "stp/sc"), ("nwy", "stp/nc"),
];
