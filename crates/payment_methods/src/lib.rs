pub mod configs;
pub mod consts;
pub mod controller;
pub mod core;
pub mod encryption;
pub mod storage;
pub mod types;

pub use crate::{
    controller::{OnsiteGateway, PaymentMethodsController},
    core::errors::{PaymentMethodsError, PmResult},
};
