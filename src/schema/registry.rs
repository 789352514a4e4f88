//! Process-wide cache of option tables, one per record type

use super::{ConfigRecord, Schema};
use crate::error::{ConfigError, Result};
use std::any::{Any, TypeId};
use std::sync::{Arc, LazyLock};

type Shared = Arc<dyn Any + Send + Sync>;

static SCHEMAS: LazyLock<scc::HashMap<TypeId, Shared>> = LazyLock::new(scc::HashMap::default);

/// Fetch the cached table for `R`, building it on first use.
///
/// Racing first calls may each build a table; the first one inserted wins
/// and every caller receives that same `Arc`. Failed builds are not cached.
pub(super) fn schema_for<R: ConfigRecord>() -> Result<Arc<Schema<R>>> {
    let id = TypeId::of::<R>();
    if let Some(cached) = SCHEMAS.read(&id, |_, schema| schema.clone()) {
        return downcast(cached);
    }

    let built: Shared = Arc::new(Schema::<R>::build()?);
    let shared = match SCHEMAS.insert(id, built.clone()) {
        Ok(()) => built,
        Err(_) => SCHEMAS.read(&id, |_, schema| schema.clone()).unwrap_or(built),
    };
    downcast(shared)
}

fn downcast<R: ConfigRecord>(shared: Shared) -> Result<Arc<Schema<R>>> {
    shared.downcast::<Schema<R>>().map_err(|_| {
        ConfigError::InvalidSchema(format!(
            "cached option table for {} has the wrong type",
            std::any::type_name::<R>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaBuilder;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        count: i32,
    }

    impl ConfigRecord for Counter {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            crate::option!(schema, count);
        }
    }

    #[test]
    fn test_same_table_for_every_caller() {
        let first = schema_for::<Counter>().unwrap();
        let second = schema_for::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_use_converges() {
        #[derive(Debug, Clone, Default)]
        struct Racy {
            value: i64,
        }

        impl ConfigRecord for Racy {
            fn describe(schema: &mut SchemaBuilder<Self>) {
                crate::option!(schema, value);
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| schema_for::<Racy>().unwrap()))
            .collect();
        let tables: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for table in &tables {
            assert!(Arc::ptr_eq(table, &tables[0]));
        }
    }
}
