#![allow(dead_code)]

pub mod sheet_testkit;
