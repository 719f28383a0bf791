pub mod jutsu;

pub use jutsu::{
    Category, DEFAULT_PAGE_SIZE, Element, Jutsu, JutsuDraft, JutsuFilter, JutsuPatch,
    MAX_PAGE_SIZE, Ordering, Page, Rank,
};
