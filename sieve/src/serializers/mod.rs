mod json;

pub use json::{
    expressions_from_json, parameters_from_json, parse_batch, value_from_json, BatchDocument,
};
