//! 诊断路由：白名单命令与白名单抓取，默认关闭

pub mod fetcher;
pub mod handler;
pub mod invoker;
pub mod service;
