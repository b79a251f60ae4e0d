use serde_json::Value;

use crate::{
  document::{Document, Schema},
  generator::{
    ast::{ClientDef, ModelDef, OperationDef},
    converter::{ClientOutput, ClientSynthesizer, ModelOutput, ModelSynthesizer},
  },
};

pub(super) fn document(value: Value) -> Document {
  serde_json::from_value(value).expect("document fixture decodes")
}

pub(super) fn schema(value: Value) -> Schema {
  serde_json::from_value(value).expect("schema fixture decodes")
}

pub(super) fn models(document: &Document) -> ModelOutput {
  ModelSynthesizer::new(document).synthesize().expect("models synthesize")
}

pub(super) fn client(document: &Document) -> ClientOutput {
  let models = models(document);
  ClientSynthesizer::new(document, &models.cache, &models.models)
    .synthesize(None)
    .expect("client synthesizes")
}

pub(super) fn model<'a>(output: &'a ModelOutput, name: &str) -> &'a ModelDef {
  output
    .models
    .iter()
    .find(|model| model.name() == name)
    .unwrap_or_else(|| panic!("model {name} not emitted"))
}

pub(super) fn operation<'a>(client: &'a ClientDef, ident: &str) -> &'a OperationDef {
  client
    .operations
    .iter()
    .find(|op| op.ident == ident)
    .unwrap_or_else(|| panic!("operation {ident} not emitted"))
}
