//! Meteorological enrichment integration tests

use super::{add_meteo_file, create_input_dir, processor};
use crate::constants::output_files;
use crate::models::ComputationMode;
use crate::processor::reader::{parse_number, read_string_frame, string_column};
use tempfile::TempDir;

#[tokio::test]
async fn test_enrich_from_clean_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_input_dir(&temp_dir);
    let meteo_file = add_meteo_file(&input);
    let processor = processor(&temp_dir, input);

    processor.clean().await.unwrap();

    let observations = processor.load_clean_table(None).unwrap();
    let (readings, dropped) = processor.aggregate(&observations);
    assert_eq!(dropped, 1);

    let located = processor.locate_meteo_file(None).unwrap();
    assert_eq!(located.as_ref(), Some(&meteo_file));

    let stats = processor.enrich_with_meteo(readings, &meteo_file).unwrap();
    assert_eq!(stats.aggregate_rows, 2);

    let path = processor.output_file(output_files::METEO);
    let frame = read_string_frame(&path).unwrap();
    assert_eq!(frame.height(), 2);

    let rain = string_column(&frame, "precipitacion_mm", &path).unwrap();
    let wind = string_column(&frame, "viento_ms", &path).unwrap();
    assert_eq!(rain.get(0).and_then(parse_number), Some(1.5));
    assert_eq!(wind.get(0).and_then(parse_number), Some(2.0));
}

#[tokio::test]
async fn test_days_without_weather_stay_empty() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_input_dir(&temp_dir);
    let meteo_file = input.join("Dades_meteorologiques_XEMA_2022.csv");
    std::fs::write(
        &meteo_file,
        "NOM_VARIABLE,DATA_LECTURA,VALOR\nPrecipitació acumulada diària,01/01/2022,\"4,0\"\n",
    )
    .unwrap();
    let processor = processor(&temp_dir, input);

    let (observations, _) = processor.clean().await.unwrap();
    let (readings, _) = processor
        .compute_aqi(observations, ComputationMode::Aggregate)
        .unwrap();
    processor.enrich_with_meteo(readings, &meteo_file).unwrap();

    let path = processor.output_file(output_files::METEO);
    let frame = read_string_frame(&path).unwrap();
    let rain = string_column(&frame, "precipitacion_mm", &path).unwrap();
    assert_eq!(rain.null_count(), frame.height());
}

#[tokio::test]
async fn test_pipeline_without_meteo_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_input_dir(&temp_dir);
    let processor = processor(&temp_dir, input);

    let stats = processor.run_pipeline(None).await.unwrap();

    assert_eq!(stats.output_paths.len(), 3);
    assert!(!processor.output_file(output_files::METEO).exists());
}
