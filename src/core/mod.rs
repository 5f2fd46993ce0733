pub mod creator;
pub mod dataframe;
pub mod engine;
pub mod error;
pub mod interfaceless;
pub mod schema;

use std::any::Any;
use std::collections::HashMap;

/// The Alias for serde_json::Value, used for parameters and cell values
pub type ParamValue = serde_json::Value;

/// Parameters handed to a Creator, forwarded as keyword arguments.
pub type ParamDict = HashMap<String, ParamValue>;

/// A helper trait that just provides the `as_any` method.
/// Needed for downcasting the trait objects of this crate (Creators, engines, dataframes).
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
