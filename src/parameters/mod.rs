// Parameter Splitting Module
//
// Turns an externally supplied parameter list into extra scan templates:
//
// - config: the parameter list, batch size, method and encoding (ParamsCfg),
//           plus reading the list from a file
// - alteration: splitting one template into one template per parameter batch
// - substitution: encoding a batch into a query string or request body
//
// Architecture:
//   substitution.rs (leaf, pure encoding helpers)
//       ↑
//   alteration.rs (ParamsCfg::alter, uses substitution)
//       ↑
//   factory.rs / pipeline.rs (alter every base template)

pub mod alteration;
pub mod config;
pub mod substitution;

pub use config::*;
