//! Data models: the OpenAlex wire format and the persisted record schema.

mod record;
mod work;

pub use record::PublicationRecord;
pub use work::{AuthorRef, Authorship, Location, Source, Work, WorkIds};
