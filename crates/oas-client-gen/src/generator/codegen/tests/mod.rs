mod client;

use serde_json::Value;

use crate::{
  document::Document,
  generator::converter::{ClientOutput, ClientSynthesizer, ModelOutput, ModelSynthesizer},
};

fn document(value: Value) -> Document {
  serde_json::from_value(value).expect("document fixture decodes")
}

fn synthesize(document: &Document) -> (ModelOutput, ClientOutput) {
  let models = ModelSynthesizer::new(document).synthesize().expect("models synthesize");
  let client = ClientSynthesizer::new(document, &models.cache, &models.models)
    .synthesize(None)
    .expect("client synthesizes");
  (models, client)
}
