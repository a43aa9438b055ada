use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use wire_codec::{datetime_from_string_iso, datetime_to_string, duration_from_string,
                 duration_to_string, integer_from_string, DateTimeAttrs, IntegerAttrs};
use wire_model::{BinaryEncoding, FileValue};
use wire_server::{NoopEvents, RequestContext, Server};
use wireflow_rust::protocols::{DemoHandler, FlatJsonProtocol};

fn main() {
    // Cargar variables de entorno desde .env si existe (antes de leer CONFIG)
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .init();

    println!("--- Iniciando validación de escalares ---");
    run_scalar_validation();
    println!("--- Iniciando validación del pipeline ---");
    run_pipeline_validation();
    println!("--- Iniciando validación de archivos ---");
    run_file_validation();
}

/// Validación de escalares: ida y vuelta de duraciones, fechas-hora ISO y
/// rechazo de enteros demasiado largos.
fn run_scalar_validation() {
    let duration = duration_from_string("P1DT2H30M").expect("duración válida");
    assert_eq!(duration_to_string(duration), "P1DT2H30M");

    // un día exacto corta antes de la parte horaria
    let whole_day = duration_from_string("PT86400S").expect("duración válida");
    assert_eq!(duration_to_string(whole_day), "P1D");

    let attrs = DateTimeAttrs::default();
    let parsed = datetime_from_string_iso(&attrs, "2024-06-15T08:00:00Z").expect("fecha válida");
    assert_eq!(datetime_to_string(&attrs, parsed), "2024-06-15T08:00:00+00:00");

    let short = IntegerAttrs { max_str_len: Some(4), ..Default::default() };
    assert!(integer_from_string(&short, "12345").is_err(),
            "un entero de cinco dígitos debe exceder max_str_len=4");

    println!("!Validación de escalares: OK (duración, fecha-hora, longitud máxima)");
}

/// Validación del pipeline completo: eco, método void, método desconocido y
/// petición malformada, siempre con respuesta bien formada.
fn run_pipeline_validation() {
    let server = Server::new(FlatJsonProtocol::default(),
                             FlatJsonProtocol::default(),
                             DemoHandler,
                             NoopEvents);

    let request = br#"{"body":{"method":"echo","params":{"n":7}}}"#.to_vec();
    let contexts = server.process_request_cycle(RequestContext::new(request));
    let response = decode_response(&contexts[0]);
    assert_eq!(response, json!({"result": {"n": 7}}));
    println!("echo → {response}");

    let contexts = server.process_request_cycle(RequestContext::new(
        br#"{"body":{"method":"ping"}}"#.to_vec()));
    assert_eq!(decode_response(&contexts[0]), json!({"result": null}));

    let contexts = server.process_request_cycle(RequestContext::new(
        br#"{"body":{"method":"inexistente"}}"#.to_vec()));
    let response = decode_response(&contexts[0]);
    assert_eq!(response["fault"]["code"], "Client.ResourceNotFound");
    println!("método desconocido → {response}");

    let contexts = server.process_request_cycle(RequestContext::new(b"<<< basura >>>".to_vec()));
    let response = decode_response(&contexts[0]);
    assert_eq!(response["fault"]["code"], "Client.ParseError");

    println!("!Validación del pipeline: OK (eco, void, falla nombrada, entrada malformada)");
}

/// Validación de archivos: volcar un valor en memoria a disco y recuperarlo
/// por bloques en base64.
fn run_file_validation() {
    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut file = FileValue::buffered(vec![payload.clone()]).with_mime_type("application/octet-stream");
    file.rollover().expect("rollover a disco");

    let encoded: String = file.base64_chunks()
                              .expect("archivo en disco")
                              .collect::<Result<Vec<_>, _>>()
                              .expect("lectura por bloques")
                              .concat();
    let decoded = wire_model::decode_chunks(encoded.as_bytes(), BinaryEncoding::Base64)
        .expect("base64 válido")
        .concat();
    assert_eq!(decoded, payload, "la ida y vuelta por disco debe preservar los bytes");
    file.path().map(|p| std::fs::remove_file(p).ok());

    println!("!Validación de archivos: OK (rollover y lectura base64 por bloques)");
}

fn decode_response(ctx: &RequestContext) -> Value {
    let chunks = ctx.out_string.as_ref().expect("out_string siempre presente");
    serde_json::from_slice(&chunks.concat()).expect("respuesta JSON")
}
