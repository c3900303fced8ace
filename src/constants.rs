//! Application constants for the air-quality processor
//!
//! File naming conventions of the Barcelona open-data portal, column names of
//! the raw and derived tables, and default values shared by the CLI and the
//! configuration layer.

// =============================================================================
// Input Files
// =============================================================================

/// Monthly wide-format measurement files, e.g. `2023_01_Gener_qualitat_aire_BCN.csv`
pub const MONTHLY_FILE_PATTERN: &str = "*_qualitat_aire_BCN.csv";

/// Pollutant dictionary (code → description)
pub const POLLUTANTS_FILE: &str = "qualitat_aire_contaminants.csv";

/// Station registry (code → name and coordinates)
pub const STATIONS_FILE: &str = "2025_qualitat_aire_estacions.csv";

/// Daily XEMA meteorological observations
pub const METEO_FILE_PATTERN: &str = "Dades_meteorol*_XEMA_*.csv";

// =============================================================================
// Raw Monthly Table
// =============================================================================

pub mod raw_columns {
    pub const STATION: &str = "ESTACIO";
    pub const POLLUTANT_CODE: &str = "CODI_CONTAMINANT";
    pub const YEAR: &str = "ANY";
    pub const MONTH: &str = "MES";
    pub const DAY: &str = "DIA";

    /// Columns that identify a row; every monthly file must carry all of them
    pub const ID_COLUMNS: &[&str] = &[STATION, POLLUTANT_CODE, YEAR, MONTH, DAY];

    /// Administrative columns that never hold hourly values
    pub const NON_HOUR_COLUMNS: &[&str] = &["MUNICIPI", "PROVINCIA"];
}

/// Hour columns look like `H01`, `H24` or `V01_H01`; the capture is the hour
pub const HOUR_COLUMN_REGEX: &str = r"H(\d+)";

/// Highest hour number carried by the raw files (`H24`)
pub const MAX_HOUR: u8 = 24;

// =============================================================================
// Lookup Tables
// =============================================================================

pub mod pollutant_columns {
    pub const CODE: &str = "Codi_Contaminant";
    pub const DESCRIPTION: &str = "Desc_Contaminant";
}

pub mod station_columns {
    pub const CODE: &str = "Estacio";
    pub const LATITUDE: &str = "Latitud";
    pub const LONGITUDE: &str = "Longitud";
    pub const NAME: &str = "nom_cabina";
}

pub mod meteo_columns {
    pub const VARIABLE: &str = "NOM_VARIABLE";
    pub const VALUE: &str = "VALOR";
    pub const DATE: &str = "DATA_LECTURA";
}

/// Variables kept from the XEMA file
pub const METEO_PRECIPITATION_VARIABLE: &str = "Precipitació acumulada diària";
pub const METEO_WIND_SPEED_VARIABLE: &str = "Velocitat mitjana diària del vent 10 m (esc.)";

/// Date format used by `DATA_LECTURA`
pub const METEO_DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// Derived Tables
// =============================================================================

pub mod clean_columns {
    pub const DATE: &str = "fecha";
    pub const HOUR: &str = "hora";
    pub const STATION_CODE: &str = "codigo_estacion";
    pub const STATION_NAME: &str = "nombre_estacion";
    pub const POLLUTANT_CODE: &str = "codigo_contaminante";
    pub const POLLUTANT: &str = "contaminante";
    pub const CONCENTRATION: &str = "concentracion";
    pub const LATITUDE: &str = "latitud";
    pub const LONGITUDE: &str = "longitud";
}

pub mod aqi_columns {
    pub const POLLUTANT_KEY: &str = "contaminante_clave";
    pub const INDIVIDUAL_AQI: &str = "AQI_individual";
    pub const AQI: &str = "AQI";
    pub const CATEGORY: &str = "categoria_AQI";
    pub const SUB_INDEX_PREFIX: &str = "AQI_";
    pub const PRECIPITATION: &str = "precipitacion_mm";
    pub const WIND_SPEED: &str = "viento_ms";
}

/// Dates in derived tables are written as ISO dates
pub const CLEAN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Output file stems; the extension follows the configured output format
pub mod output_files {
    pub const CLEAN: &str = "datos_calidad_aire_limpios";
    pub const AGGREGATE: &str = "datos_con_AQI";
    pub const INDIVIDUAL: &str = "datos_con_aqi_individual";
    pub const METEO: &str = "datos_completos_con_meteo";
}

// =============================================================================
// Processing Defaults
// =============================================================================

/// Upper bound for the default worker count
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Hard limit accepted by configuration validation
pub const MAX_WORKERS: usize = 64;

/// Input directory used when `--input` is not given
pub const DEFAULT_INPUT_DIR: &str = "data";

/// Output directory used when `--output` is not given
pub const DEFAULT_OUTPUT_DIR: &str = "output";
