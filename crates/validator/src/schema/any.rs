use crate::describe::{Description, SchemaKind};
use crate::foundation::Validate;
use crate::schema::{Common, SchemaBuilder};

/// Accepts any value; only the common attributes apply.
#[derive(Debug, Clone, Default)]
pub struct AnySchema {
    common: Common,
}

impl Validate for AnySchema {
    fn common(&self) -> &Common {
        &self.common
    }

    fn describe(&self) -> Description {
        Description::new(SchemaKind::Any, &self.common)
    }
}

impl SchemaBuilder for AnySchema {
    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}
