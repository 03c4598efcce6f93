//! Общее ядро фронтенда LMS: модели REST API и чистая логика состояния страниц.
//!
//! Крейт не делает I/O. Страницы (`lms-wasm`) и CLI (`lms-cli`) вызывают
//! удалённые операции сами, а сюда передают результаты:
//! - оптимистичные вставки и сверка списков (`collection`, `transcript`);
//! - машина состояний списка и выбора (`selection`);
//! - меню элемента списка с взаимным исключением режимов (`menu`);
//! - состояние членства в сообществе (`membership`);
//! - подготовка данных для графиков и форматирование (`charts`, `timestamp`).
#![warn(missing_docs)]

pub mod charts;
pub mod chat;
pub mod collection;
pub mod community;
mod error;
pub mod membership;
pub mod menu;
pub mod models;
pub mod notice;
pub mod post_card;
pub mod remote;
pub mod selection;
pub mod timestamp;
pub mod transcript;

pub use error::{StateError, StateResult};
