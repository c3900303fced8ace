//! Integration tests for the processor module
//!
//! Tests the pipeline stages against a small input directory laid out like
//! the open-data download.

pub mod meteo_enrichment;

use crate::config::AqiConfig;
use crate::constants::{POLLUTANTS_FILE, STATIONS_FILE};
use crate::processor::AirQualityProcessor;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const POLLUTANTS_CSV: &str = "Codi_Contaminant,Desc_Contaminant,Unitats\n\
    8,NO2,µg/m³\n\
    10,PM10,µg/m³\n\
    14,O3,µg/m³\n\
    6,CO,mg/m³\n";

pub const STATIONS_CSV: &str = "Estacio,nom_cabina,Codi_Contaminant,Latitud,Longitud\n\
    4,Barcelona - Poblenou,8,41.4039,2.2045\n\
    4,Barcelona - Poblenou,10,41.4039,2.2045\n\
    43,Barcelona - Eixample,14,41.3853,2.1538\n";

/// Station 4 measures NO2 (35, 40) and PM10 (60, missing); station 43
/// measures O3 (0, missing). Zero has no AQI.
pub const JANUARY_CSV: &str = "ESTACIO,CODI_CONTAMINANT,ANY,MES,DIA,H01,V01,H02,V02\n\
    4,8,2023,1,15,35,V,40,V\n\
    4,10,2023,1,15,60,V,,N\n\
    43,14,2023,1,15,0,V,,N\n";

pub const METEO_CSV: &str = "ID,CODI_ESTACIO,CODI_VARIABLE,NOM_VARIABLE,DATA_LECTURA,VALOR,CODI_BASE\n\
    1,X4,1300,Precipitació acumulada diària,15/01/2023,\"1,5\",DM\n\
    2,X4,1505,Velocitat mitjana diària del vent 10 m (esc.),15/01/2023,\"2,0\",DM\n";

/// Lay out lookups and one valid monthly file under `<temp>/input`
pub fn create_input_dir(temp_dir: &TempDir) -> PathBuf {
    let input = temp_dir.path().join("input");
    let year_dir = input.join("2023");
    fs::create_dir_all(&year_dir).unwrap();

    fs::write(input.join(POLLUTANTS_FILE), POLLUTANTS_CSV).unwrap();
    fs::write(input.join(STATIONS_FILE), STATIONS_CSV).unwrap();
    fs::write(year_dir.join("2023_01_Gener_qualitat_aire_BCN.csv"), JANUARY_CSV).unwrap();

    input
}

pub fn add_meteo_file(input: &std::path::Path) -> PathBuf {
    let path = input.join("Dades_meteorologiques_XEMA_2023.csv");
    fs::write(&path, METEO_CSV).unwrap();
    path
}

pub fn test_config() -> AqiConfig {
    AqiConfig::default()
        .with_workers(2)
        .with_show_progress(false)
}

pub fn processor(temp_dir: &TempDir, input: PathBuf) -> AirQualityProcessor {
    AirQualityProcessor::new(input, temp_dir.path().join("output")).with_config(test_config())
}
