pub mod client_ext;
pub mod fs;

pub use crate::client_ext::util::{build_client, ClientUtilExt as Util, HttpError};
pub use crate::fs::read_text;
