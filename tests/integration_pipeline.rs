//! Integration tests for the air-quality pipeline
//!
//! These tests drive the public API end to end over a small but realistic
//! input directory: two months for two stations, one malformed file and an
//! XEMA meteorological file.

use aqi_processor::processor::reader::{parse_number, read_string_frame, string_column};
use aqi_processor::{
    AirQualityProcessor, AqiConfig, Category, ComputationMode, OutputFormat, PollutantKey,
    categorize, classify, interpolate, resolve,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const POLLUTANTS: &str = "Codi_Contaminant,Desc_Contaminant,Unitats\n\
    7,NO,µg/m³\n\
    8,NO2,µg/m³\n\
    10,PM10,µg/m³\n\
    14,O3,µg/m³\n\
    9,PM2.5,µg/m³\n";

const STATIONS: &str = "Estacio,nom_cabina,Codi_Contaminant,Latitud,Longitud\n\
    4,Barcelona - Poblenou,8,41.4039,2.2045\n\
    4,Barcelona - Poblenou,10,41.4039,2.2045\n\
    54,Barcelona - Palau Reial,14,41.3875,2.1151\n";

const JANUARY: &str = "CODI_PROVINCIA,PROVINCIA,CODI_MUNICIPI,MUNICIPI,ESTACIO,CODI_CONTAMINANT,ANY,MES,DIA,H01,V01,H02,V02\n\
    8,Barcelona,19,Barcelona,4,8,2023,1,1,35,V,95,V\n\
    8,Barcelona,19,Barcelona,4,10,2023,1,1,60,V,20,V\n\
    8,Barcelona,19,Barcelona,4,7,2023,1,1,12,V,14,V\n\
    8,Barcelona,19,Barcelona,54,14,2023,1,1,250,V,,N\n";

const FEBRUARY: &str = "CODI_PROVINCIA,PROVINCIA,CODI_MUNICIPI,MUNICIPI,ESTACIO,CODI_CONTAMINANT,ANY,MES,DIA,H01,V01\n\
    8,Barcelona,19,Barcelona,4,9,2023,2,1,15,V\n\
    8,Barcelona,19,Barcelona,4,8,2023,2,1,1000,V\n";

const XEMA: &str = "ID,CODI_ESTACIO,CODI_VARIABLE,NOM_VARIABLE,DATA_LECTURA,VALOR,CODI_BASE\n\
    1,X4,1300,Precipitació acumulada diària,01/01/2023,\"3,2\",DM\n\
    2,D5,1300,Precipitació acumulada diària,01/01/2023,\"0,8\",DM\n\
    3,X4,1505,Velocitat mitjana diària del vent 10 m (esc.),01/01/2023,\"4,1\",DM\n";

fn build_input(temp_dir: &TempDir) -> PathBuf {
    let input = temp_dir.path().join("data");
    let year = input.join("2023");
    fs::create_dir_all(&year).unwrap();

    fs::write(input.join("qualitat_aire_contaminants.csv"), POLLUTANTS).unwrap();
    fs::write(input.join("2025_qualitat_aire_estacions.csv"), STATIONS).unwrap();
    fs::write(year.join("2023_01_Gener_qualitat_aire_BCN.csv"), JANUARY).unwrap();
    fs::write(year.join("2023_02_Febrer_qualitat_aire_BCN.csv"), FEBRUARY).unwrap();
    fs::write(year.join("2023_03_Marc_qualitat_aire_BCN.csv"), "garbage\n").unwrap();
    fs::write(
        input.join("Dades_meteorològiques_diàries_de_la_XEMA_2023.csv"),
        XEMA,
    )
    .unwrap();

    input
}

fn config() -> AqiConfig {
    AqiConfig::default().with_workers(3).with_show_progress(false)
}

fn column_values(path: &Path, column: &str) -> Vec<Option<String>> {
    let frame = read_string_frame(path).unwrap();
    let values = string_column(&frame, column, path).unwrap();
    values.into_iter().map(|v| v.map(str::to_string)).collect()
}

#[test]
fn test_worked_example() {
    // NO2 = 35 and PM10 = 60 at the same station and hour
    let no2 = interpolate(PollutantKey::No2, 35.0);
    let pm10 = interpolate(PollutantKey::Pm10, 60.0);
    assert_eq!(no2, Some(43.75));
    assert_eq!(pm10, Some(112.5));

    let overall = resolve([no2, pm10]);
    assert_eq!(overall, Some(112.5));
    assert_eq!(categorize(overall), Category::UnhealthyForSensitiveGroups);

    assert_eq!(classify(" NO2* "), Some(PollutantKey::No2));
    assert_eq!(classify("CO"), None);
}

#[tokio::test]
async fn test_full_pipeline_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let input = build_input(&temp_dir);
    let output = temp_dir.path().join("output");

    let processor = AirQualityProcessor::new(input, output.clone()).with_config(config());
    let stats = processor.run_pipeline(None).await.unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 1);
    // Seven non-empty hourly cells in January, two in February
    assert_eq!(stats.observations, 9);
    assert_eq!(stats.output_paths.len(), 4);

    // Groups in key order: Jan-1 H1 station 4, Jan-1 H1 station 54,
    // Jan-1 H2 station 4, Feb-1 H1 station 4
    let aggregate = output.join("datos_con_AQI.csv");
    let aqi = column_values(&aggregate, "AQI");
    assert_eq!(aqi.len(), 4);

    let categories = column_values(&aggregate, "categoria_AQI");
    assert_eq!(
        categories,
        [
            Category::UnhealthyForSensitiveGroups,
            Category::VeryUnhealthy,
            Category::UnhealthyForSensitiveGroups,
            Category::Hazardous,
        ]
        .iter()
        .map(|category| Some(category.label().to_string()))
        .collect::<Vec<_>>()
    );

    // PM2.5 only appears in February
    let pm25 = column_values(&aggregate, "AQI_PM2.5");
    assert_eq!(pm25[0], None);
    assert_eq!(pm25[3].as_deref().and_then(parse_number), Some(50.0));

    // NO is not one of the scored pollutants
    let individual = output.join("datos_con_aqi_individual.csv");
    let labels = column_values(&individual, "contaminante");
    assert!(!labels.contains(&Some("NO".to_string())));
    assert_eq!(labels.len(), 7);

    let meteo = output.join("datos_completos_con_meteo.csv");
    let rain = column_values(&meteo, "precipitacion_mm");
    let mean_rain = rain[0].as_deref().and_then(parse_number).unwrap();
    assert!((mean_rain - 2.0).abs() < 1e-9);
    assert_eq!(rain[3], None);
    let wind = column_values(&meteo, "viento_ms");
    assert_eq!(wind[1].as_deref().and_then(parse_number), Some(4.1));
}

#[tokio::test]
async fn test_stages_run_separately() {
    let temp_dir = TempDir::new().unwrap();
    let input = build_input(&temp_dir);
    let output = temp_dir.path().join("output");

    let processor = AirQualityProcessor::new(input, output.clone())
        .with_config(config().with_output_format(OutputFormat::Parquet));

    processor.clean().await.unwrap();
    assert!(output.join("datos_calidad_aire_limpios.parquet").exists());

    let observations = processor.load_clean_table(None).unwrap();
    assert_eq!(observations.len(), 9);

    let (aggregate, stats) = processor
        .compute_aqi(observations, ComputationMode::Aggregate)
        .unwrap();
    assert_eq!(stats.aggregate_rows, 4);
    assert_eq!(
        aggregate[0].dominant_pollutant(),
        Some(PollutantKey::Pm10)
    );
    assert!(output.join("datos_con_AQI.parquet").exists());
    assert!(!output.join("datos_con_aqi_individual.parquet").exists());
}
