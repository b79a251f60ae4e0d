mod derives;
mod documentation;
mod models;
mod operations;
mod types;


pub use derives::{DeriveTrait, enum_derives, record_derives};
pub use documentation::Documentation;
pub use models::{EnumDef, EnumMember, FieldDef, ModelDef, RecordDef, UNDEFINED_MEMBER};
pub use operations::{
  ApiKeyDef, ApiKeyPlacement, BodyEncoding, ClientDef, MultipartBody, MultipartField, OperationDef, ParameterDef,
  ParameterKind, PartEncoding, PathPart, RequestBodyDef, ResponseKind, TextEncoding,
};
pub use types::{FORM_FILE_TYPE, RustPrimitive, TypeRef};
