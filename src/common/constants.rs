/// Service endpoints, keyword names and text formats shared across the application

// Default service endpoints (overridable through config.toml / environment)
pub const HEK_SEARCH_URL: &str = "https://www.lmsal.com/hek/her";
pub const JSOC_INFO_URL: &str = "http://jsoc.stanford.edu/cgi-bin/ajax/jsoc_info";
pub const HARP_CATALOG_URL: &str =
    "http://jsoc.stanford.edu/doc/data/hmi/harpnum_to_noaa/all_harps_with_noaa_ars.txt";
pub const SHARP_SERIES: &str = "hmi.sharp_720s";

// Coordinate keywords, requested in this exact order
pub const LAT_FWT: &str = "LAT_FWT";
pub const LON_FWT: &str = "LON_FWT";
pub const CRLN_OBS: &str = "CRLN_OBS";
pub const COORDINATE_KEYS: [&str; 3] = [LAT_FWT, LON_FWT, CRLN_OBS];

// Region catalog column headers
pub const CATALOG_PATCH_COLUMN: &str = "HARPNUM";
pub const CATALOG_REGIONS_COLUMN: &str = "NOAA_ARS";

/// Literal the coordinate service uses for keywords with no value
pub const MISSING_MARKER: &str = "MISSING";
/// Fitted coordinates above this are non-physical fits
pub const SENTINEL_THRESHOLD: f64 = 1000.0;

pub const OUTPUT_HEADER: &str = "class,level,time,latitude,longitude";

// chrono strftime patterns
pub const RECORD_TIME_FORMAT: &str = "%Y.%m.%d_%H:%M_TAI";
pub const DISPLAY_TIME_FORMAT: &str = "%d %B %Y at %H:%M";
pub const CLI_TIME_FORMATS: [&str; 4] = [
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];
pub const HEK_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// HEK query constants
pub const HEK_EVENT_TYPE: &str = "FL";
pub const HEK_OBSERVATORY: &str = "GOES";
pub const HEK_FRM_NAME: &str = "SWPC";

pub const DEFAULT_CONFIG_PATH: &str = "flare_catalog.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_PREFIX: &str = "flare_catalog.log";
