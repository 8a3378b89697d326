//! RDAP lookup toolbox for rdap-viewer
//!
//! 查询公共 RDAP 聚合服务并将返回的域名注册数据渲染为纯文本报告。
//! 一次查询 = 一次 HTTP GET；结果无持久化，下一次查询整体替换。
//!
//! ```rust,no_run
//! use rdap_viewer_toolbox::{ClientOptions, FormatOptions, RdapClient, format_report};
//! # async fn demo() -> rdap_viewer_toolbox::RdapResult<()> {
//! let client = RdapClient::new(&ClientOptions::default())?;
//! let result = client.lookup("example.com").await?;
//! let report = format_report(&result, "example.com", &FormatOptions::default());
//! println!("{}", report.text);
//! # Ok(())
//! # }
//! ```

mod error;
mod export;
mod http_client;
mod services;
mod session;
mod types;
mod utils;

pub use error::{RdapError, RdapResult};
pub use export::{FileExporter, ReportExporter};
pub use services::{
    ClientOptions, ContactCard, DEFAULT_ENDPOINT, DEFAULT_PLACEHOLDER, DEFAULT_TIMEOUT,
    FormatOptions, RdapClient, format_json, format_report, normalize_endpoint, parse_vcard,
    suggested_filename, validate_domain,
};
pub use session::LookupSession;
pub use types::{
    DsData, Entity, Event, IpAddresses, KeyData, Link, LookupResult, Nameserver, Notice,
    PublicId, Report, Scalar, SecureDns,
};
