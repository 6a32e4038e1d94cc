pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod parsing;
pub mod session;

pub use api::{Endpoints, NewTransaction, SuiApi, Target};
pub use client::{Client, Entry};
pub use error::{Error, Lock, Result};
pub use model::{AccountBook, AccountBookMeta, Category, SuiDate, Transaction, TransactionType};
pub use session::{HttpSession, ReqwestSession, Response};
