use bytes::Bytes;
use futures_core::future::BoxFuture;
use std::sync::Arc;


/// Source of the current head block as raw, not yet parsed JSON.
pub trait BlockSource: Sync {
    fn get_now_block(&self) -> BoxFuture<'_, anyhow::Result<Bytes>>;
}


impl <T: BlockSource + Send + ?Sized> BlockSource for Arc<T> {
    fn get_now_block(&self) -> BoxFuture<'_, anyhow::Result<Bytes>> {
        self.as_ref().get_now_block()
    }
}
