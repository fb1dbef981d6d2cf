//! Byte-level persistence around the block entity NBT hooks.

use std::io::Cursor;

use simdnbt::owned::{BaseNbt, NbtCompound};
use thiserror::Error;

use crate::block_entity::BlockEntity;

/// Error produced when decoding persisted block entity bytes.
///
/// Only the byte-level envelope can fail; bad *content* (unknown tank
/// indices, out-of-domain mode ordinals, unknown fluids) is skipped or
/// defaulted by the entity's own load hook.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The bytes were not well-formed NBT.
    #[error("malformed nbt")]
    Nbt(#[from] simdnbt::Error),
    /// The bytes decoded to an end tag instead of a root compound.
    #[error("missing root compound")]
    MissingRoot,
}

/// Serializes a block entity's state to NBT bytes.
#[must_use]
pub fn save_block_entity(block_entity: &dyn BlockEntity) -> Vec<u8> {
    let mut nbt = NbtCompound::new();
    block_entity.save_additional(&mut nbt);

    let mut bytes = Vec::new();
    BaseNbt::new("", nbt).write(&mut bytes);
    bytes
}

/// Restores a block entity's state from bytes written by
/// [`save_block_entity`].
pub fn load_block_entity(
    block_entity: &mut dyn BlockEntity,
    bytes: &[u8],
) -> Result<(), PersistError> {
    let nbt = simdnbt::borrow::read(&mut Cursor::new(bytes))?;
    let simdnbt::borrow::Nbt::Some(root) = nbt else {
        return Err(PersistError::MissingRoot);
    };

    let view: simdnbt::borrow::NbtCompound<'_, '_> = root.as_compound();
    block_entity.load_additional(&view);
    Ok(())
}
