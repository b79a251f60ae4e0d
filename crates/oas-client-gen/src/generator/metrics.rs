use strum::Display;

use crate::generator::ast::{ClientDef, ModelDef, UNDEFINED_MEMBER};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub records_generated: usize,
  pub enums_generated: usize,
  pub placeholder_enums_generated: usize,
  pub operations_converted: usize,
  pub multipart_operations: usize,
  pub files_written: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_model(&mut self, model: &ModelDef) {
    self.types_generated += 1;
    match model {
      ModelDef::Record(_) => self.records_generated += 1,
      ModelDef::Enum(def) => {
        self.enums_generated += 1;
        if def.members.len() == 1 && def.members[0].name == UNDEFINED_MEMBER {
          self.placeholder_enums_generated += 1;
        }
      }
    }
  }

  pub fn record_models(&mut self, models: &[ModelDef]) {
    for model in models {
      self.record_model(model);
    }
  }

  pub fn record_client(&mut self, client: &ClientDef) {
    self.operations_converted += client.operations.len();
    self.multipart_operations += client
      .operations
      .iter()
      .filter(|op| op.body.as_ref().is_some_and(|body| body.encoding.is_multipart()))
      .count();
  }

  pub fn record_file_written(&mut self) {
    self.files_written += 1;
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Schema '{schema_name}': {message}")]
  SchemaSpecific { schema_name: String, message: String },
  #[strum(to_string = "[{method} {path}] {message}")]
  OperationSpecific {
    method: String,
    path: String,
    message: String,
  },
  #[strum(to_string = "Method '{original}' renamed to '{renamed}' to avoid a collision")]
  MethodRenamed { original: String, renamed: String },
  #[strum(to_string = "Formatting '{file}' failed, keeping unformatted output: {error}")]
  FormattingFailed { file: String, error: String },
}

impl GenerationWarning {
  pub fn schema(schema_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self::SchemaSpecific {
      schema_name: schema_name.into(),
      message: message.into(),
    }
  }

  pub fn operation(method: &http::Method, path: &str, message: impl Into<String>) -> Self {
    Self::OperationSpecific {
      method: method.to_string(),
      path: path.to_string(),
      message: message.into(),
    }
  }
}
