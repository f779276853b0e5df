//! Builds and executes HTTP requests from declarative, serializable descriptions.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod body;
mod client;
mod error;
mod form_data;
mod param;
mod response;

pub use body::BodyContent;
pub use error::{Error, Result};
pub use form_data::{FormDataKind, FormDataValue};
pub use param::{Param, RespType};
pub use response::ResponseSnapshot;
