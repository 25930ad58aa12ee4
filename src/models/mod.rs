mod character;
mod character_id;
mod page;

pub use character::{CharacterField, CharacterRecord, LocalCharacterRecord};
pub use character_id::{extract_id, is_character_id};
pub use page::{Page, PAGE_SIZE};

#[cfg(test)]
pub(crate) use character::luke;
