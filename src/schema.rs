//! Normalized output schema and its correspondence to upstream field names.
//!
//! The GIOS API keys its records with Polish natural-language names whose
//! spelling is not stable (`wskaźnika` vs `wskażnika`). Every table below maps
//! a normalized key to the upstream spellings it may be read from, in order
//! of preference. Tables are constant data; [`crate::mapper`] applies them.

/// Version of the normalized response shapes served under `/api`.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Source of one normalized field.
#[derive(Debug)]
pub enum Field {
    /// Copy the first present, non-null upstream key.
    Key(&'static [&'static str]),

    /// Build a nested object from its own table.
    Object(Table),
}

/// Ordered `(normalized key, source)` pairs.
pub type Table = &'static [(&'static str, Field)];

// ---
// Wrapper keys of upstream responses

pub const STATIONS_KEY: &str = "Lista stacji pomiarowych";
pub const SENSORS_KEY: &str = "Lista stanowisk pomiarowych dla podanej stacji";
pub const MEASUREMENTS_KEY: &str = "Lista danych pomiarowych";
pub const HISTORICAL_KEY: &str = "Lista archiwalnych wyników pomiarów";
pub const AQ_INDEX_KEY: &str = "AqIndex";

// ---
// Station

pub const STATION: Table = &[
    ("id", Field::Key(&["Identyfikator stacji"])),
    ("stationName", Field::Key(&["Nazwa stacji"])),
    ("gegrLat", Field::Key(&["WGS84 φ N"])),
    ("gegrLon", Field::Key(&["WGS84 λ E"])),
    (
        "city",
        Field::Object(&[
            ("id", Field::Key(&["Identyfikator miasta"])),
            ("name", Field::Key(&["Nazwa miasta"])),
            (
                "commune",
                Field::Object(&[
                    ("communeName", Field::Key(&["Gmina"])),
                    ("districtName", Field::Key(&["Powiat"])),
                    ("provinceName", Field::Key(&["Województwo"])),
                ]),
            ),
        ]),
    ),
    ("addressStreet", Field::Key(&["Ulica"])),
];

// ---
// Sensor

pub const SENSOR: Table = &[
    ("id", Field::Key(&["Identyfikator stanowiska"])),
    ("stationId", Field::Key(&["Identyfikator stacji"])),
    (
        "param",
        Field::Object(&[
            ("paramName", Field::Key(&["Wskaźnik"])),
            ("paramCode", Field::Key(&["Wskaźnik - kod"])),
            ("paramFormula", Field::Key(&["Wskaźnik - wzór"])),
            ("idParam", Field::Key(&["Id wskaźnika"])),
        ]),
    ),
];

// ---
// Measurements

/// Upstream key naming the measuring position a series belongs to.
pub const MEASUREMENT_SERIES_KEY: &[&str] = &["Kod stanowiska"];

pub const MEASUREMENT_VALUE: Table = &[
    ("date", Field::Key(&["Data"])),
    ("value", Field::Key(&["Wartość"])),
];

// ---
// Air-quality index
//
// Upstream sends one flat object; each pollutant's fields carry the pollutant
// code as a suffix. Pollutant sub-indices take their calcDate from the
// overall calculation date, which is the only calc-date upstream fills in.

const AQ_CALC_DATE: &[&str] = &["Data wykonania obliczeń indeksu"];

macro_rules! pollutant_index {
    ($code:literal) => {
        Field::Object(&[
            ("calcDate", Field::Key(AQ_CALC_DATE)),
            (
                "sourceDataDate",
                Field::Key(&[concat!(
                    "Data danych źródłowych, z których policzono wartość indeksu dla wskaźnika ",
                    $code
                )]),
            ),
            (
                "indexLevel",
                Field::Object(&[
                    (
                        "id",
                        Field::Key(&[concat!("Wartość indeksu dla wskaźnika ", $code)]),
                    ),
                    (
                        "indexLevelName",
                        Field::Key(&[
                            concat!("Nazwa kategorii indeksu dla wskażnika ", $code),
                            concat!("Nazwa kategorii indeksu dla wskaźnika ", $code),
                        ]),
                    ),
                ]),
            ),
        ])
    };
}

pub const AQ_INDEX: Table = &[
    ("id", Field::Key(&["Identyfikator stacji pomiarowej"])),
    (
        "stIndex",
        Field::Object(&[
            ("calcDate", Field::Key(AQ_CALC_DATE)),
            (
                "sourceDataDate",
                Field::Key(&[
                    "Data danych źródłowych, z których policzono wartość indeksu dla wskaźnika st",
                ]),
            ),
            (
                "indexLevel",
                Field::Object(&[
                    ("id", Field::Key(&["Wartość indeksu"])),
                    ("indexLevelName", Field::Key(&["Nazwa kategorii indeksu"])),
                ]),
            ),
        ]),
    ),
    ("so2Index", pollutant_index!("SO2")),
    ("no2Index", pollutant_index!("NO2")),
    ("pm10Index", pollutant_index!("PM10")),
    ("pm25Index", pollutant_index!("PM2.5")),
    ("o3Index", pollutant_index!("O3")),
    (
        "indexStatus",
        Field::Key(&["Status indeksu ogólnego dla stacji pomiarowej"]),
    ),
    ("criticalParam", Field::Key(&["Kod zanieczyszczenia krytycznego"])),
];

/// Normalized keys of the pollutant sub-indices, in output order.
#[cfg(test)]
pub const POLLUTANT_INDEX_KEYS: [&str; 5] =
    ["so2Index", "no2Index", "pm10Index", "pm25Index", "o3Index"];
