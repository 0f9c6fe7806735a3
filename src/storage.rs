//! Pluggable transaction stores.
//!
//! This module defines the [`Store`] (async) and [`BlockingStore`]
//! (blocking) traits via a shared macro, mirroring the facade generation
//! pattern in [`crate::tracker`].

#[cfg(feature = "storage-file")]
mod file;
mod memory;

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

#[cfg(feature = "storage-file")]
pub use file::FileStore;
pub use memory::InMemoryStore;

/// Point-in-time copy of a store's contents.
///
/// `revision` increases with every mutation, so of two snapshots taken
/// from the same store the one with the higher revision is newer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Store revision at the time of the read.
    pub revision: u64,
    /// Every stored transaction, in no particular order.
    pub transactions: Vec<Transaction>,
}

/// Generates a store trait (async or blocking) with all record methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_store {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: $mode:ident,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_store!(@methods $mode);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        // Read
        define_store!(@method $mode, snapshot,
            "Returns every stored transaction together with the current revision.\n\n# Errors\n\nReturns an error if the store fails to read.",
            -> Result<Snapshot>);
        define_store!(@method $mode, transaction,
            "Returns the transaction with the given ID, if any.\n\n# Errors\n\nReturns an error if the store fails to read.",
            id: TransactionId, -> Result<Option<Transaction>>);

        // Write
        define_store!(@method $mode, insert,
            "Inserts a transaction and returns its ID.\n\nAn unassigned ID is replaced by the next free one; an assigned ID\nreplaces any record already stored under it.\n\n# Errors\n\nReturns an error if the store fails to write.",
            transaction: Transaction, -> Result<TransactionId>);
        define_store!(@method $mode, insert_all,
            "Inserts several transactions, returning their IDs in input order.\n\n# Errors\n\nReturns an error if the store fails to write.",
            transactions: Vec<Transaction>, -> Result<Vec<TransactionId>>);
        define_store!(@method $mode, update,
            "Replaces a stored transaction, keeping its stored `created_at` and `kind`.\n\n# Errors\n\nReturns [`SpendwiseError::TransactionNotFound`](crate::error::SpendwiseError::TransactionNotFound)\nif no record has the ID, or an error if the store fails to write.",
            transaction: Transaction, -> Result<()>);
        define_store!(@method $mode, delete,
            "Deletes the transaction with the given ID. Unknown IDs are ignored.\n\n# Errors\n\nReturns an error if the store fails to write.",
            id: TransactionId, -> Result<()>);
        define_store!(@method $mode, delete_all,
            "Deletes every stored transaction.\n\n# Errors\n\nReturns an error if the store fails to write.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_store {
    //! Async store trait definition.

    use super::Snapshot;
    use crate::error::Result;
    use crate::models::{Transaction, TransactionId};

    define_store! {
        trait_name: Store,
        trait_doc: "Async transaction store.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) and serialize their own writes.",
        mode: async_mode,
    }
}

#[cfg(feature = "blocking")]
mod blocking_store {
    //! Blocking store trait definition.

    use super::Snapshot;
    use crate::error::Result;
    use crate::models::{Transaction, TransactionId};

    define_store! {
        trait_name: BlockingStore,
        trait_doc: "Blocking transaction store.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) and serialize their own writes.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_store::Store;
#[cfg(feature = "blocking")]
pub use blocking_store::BlockingStore;
