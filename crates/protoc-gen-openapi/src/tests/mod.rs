use std::{
  io,
  sync::{Arc, Mutex},
};

use prost::Message;

use crate::{
  descriptor::{CodeGeneratorRequest, CodeGeneratorResponse},
  generator::{
    handle_request,
    plugin::OUTPUT_FILE_NAME,
    tests::support::{document, file, greeter_file, request, respond},
  },
  ui::commands::{GenerateConfig, run_plugin},
};

fn greeter_request() -> CodeGeneratorRequest {
  request(vec![greeter_file()], &["greet.proto"])
}

/// Log output collected in memory.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
  fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
  }
}

impl io::Write for CapturedLog {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().expect("log buffer").extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

#[test]
fn test_greeter_end_to_end() {
  let doc = document(&greeter_request());

  let schemas = doc["components"]["schemas"].as_object().expect("schemas");
  assert_eq!(schemas.len(), 2);
  for (title, property) in [("greet.HelloRequest", "name"), ("greet.HelloResponse", "message")] {
    let schema = &schemas[title];
    assert_eq!(schema["title"], title);
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"].as_object().map(serde_json::Map::len), Some(1));
    assert_eq!(schema["properties"][property]["type"], "string");
  }

  let paths = doc["paths"].as_object().expect("paths");
  assert_eq!(paths.len(), 1);
  let item = &paths["/greet.Greeter/SayHello"];
  assert!(item.get("get").is_none(), "only POST is bound");

  let operation = &item["post"];
  assert_eq!(operation["operationId"], "Greeter_SayHello");
  assert_eq!(
    operation["requestBody"]["content"]["application/json"]["schema"]["$ref"],
    "#/components/schemas/greet.HelloRequest"
  );
  let success = &operation["responses"]["200"];
  assert_eq!(success["description"], "A successful response.");
  assert_eq!(
    success["content"]["application/json"]["schema"]["$ref"],
    "#/components/schemas/greet.HelloResponse"
  );
}

#[test]
fn test_response_metadata() {
  let response = respond(&greeter_request());
  assert_eq!(response.supported_features, Some(1));
  assert_eq!(response.file.len(), 1);
  assert_eq!(response.file[0].name.as_deref(), Some(OUTPUT_FILE_NAME));
  assert_eq!(OUTPUT_FILE_NAME, "spec.json");
}

#[test]
fn test_generation_warnings_are_logged() {
  let mut streaming = greeter_file();
  streaming.service[0].method[0].server_streaming = Some(true);
  let loose = file("loose.proto", "", vec![], vec![]);
  let request = request(vec![loose, streaming], &["greet.proto"]);

  let log = CapturedLog::default();
  let writer = log.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(move || writer.clone())
    .with_ansi(false)
    .with_max_level(tracing::Level::WARN)
    .finish();
  let response = tracing::subscriber::with_default(subscriber, || respond(&request));

  assert_eq!(response.error, None);
  let output = log.contents();
  assert!(
    output.contains("Method 'greet.Greeter.SayHello' is streaming and is documented as a unary call"),
    "{output}"
  );
  assert!(
    output.contains("File 'loose.proto' has no package declaration and was skipped"),
    "{output}"
  );
}

#[test]
fn test_undecodable_input_is_reported_in_band() {
  let response = handle_request(&[0x0a, 0x05, 0x01]);
  assert!(response.file.is_empty());
  let error = response.error.expect("error is set");
  assert!(error.starts_with("can't unmarshal input"), "{error}");
}

#[test]
fn test_empty_input_is_an_empty_document() {
  let response = handle_request(&[]);
  assert_eq!(response.error, None);
  let content = response.file[0].content.as_deref().expect("content");
  let doc: serde_json::Value = serde_json::from_str(content).expect("document is JSON");
  assert_eq!(doc["openapi"], "3.0.0");
}

#[test]
fn test_parameter_overrides_document_settings() {
  let request = CodeGeneratorRequest {
    parameter: Some("title=Greeter API,version=2,json_names=true".to_string()),
    ..greeter_request()
  };
  let doc = document(&request);
  assert_eq!(doc["info"]["title"], "Greeter API");
  assert_eq!(doc["info"]["version"], "2");
}

#[test]
fn test_bad_parameter_is_reported_in_band() {
  let request = CodeGeneratorRequest {
    parameter: Some("colour=blue".to_string()),
    ..greeter_request()
  };
  let response = respond(&request);
  assert!(response.file.is_empty());
  assert_eq!(response.error.as_deref(), Some("unknown parameter 'colour'"));
}

#[test]
fn test_conversion_error_is_reported_in_band() {
  let mut broken = greeter_file();
  broken.service[0].method[0].input_type = Some(".greet.Missing".to_string());
  let response = respond(&request(vec![broken], &["greet.proto"]));
  assert!(response.file.is_empty());
  assert_eq!(
    response.error.as_deref(),
    Some("Failed to convert greet.proto: no such type found: .greet.Missing")
  );
}

#[tokio::test]
async fn test_run_plugin_with_files() -> anyhow::Result<()> {
  let temp_dir = tempfile::tempdir()?;
  let input = temp_dir.path().join("request.bin");
  let output = temp_dir.path().join("out").join("response.bin");
  tokio::fs::write(&input, greeter_request().encode_to_vec()).await?;

  run_plugin(GenerateConfig {
    input: Some(input),
    output: Some(output.clone()),
    ..GenerateConfig::default()
  })
  .await?;

  let response = CodeGeneratorResponse::decode(tokio::fs::read(&output).await?.as_slice())?;
  assert_eq!(response.error, None);
  let content = response.file[0].content.as_deref().unwrap_or_default();
  assert!(content.contains("/greet.Greeter/SayHello"));
  Ok(())
}

#[tokio::test]
async fn test_run_plugin_missing_input_fails() {
  let temp_dir = tempfile::tempdir().unwrap();
  let config = GenerateConfig {
    input: Some(temp_dir.path().join("absent.bin")),
    output: Some(temp_dir.path().join("response.bin")),
    ..GenerateConfig::default()
  };
  assert!(run_plugin(config).await.is_err());
}
