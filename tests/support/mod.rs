#![allow(dead_code)]

pub mod redemption;
