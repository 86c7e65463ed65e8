//! # Configuration
//!
//! Reads typed configuration values from an XML file:
//!
//! ```xml
//! <configuration>
//!   <variable name="gain" type="double" value="1.5"/>
//!   <module name="Motor">
//!     <variable name="limits" type="int32">
//!       <value index="0" value="-100"/>
//!       <value index="1" value="100"/>
//!     </variable>
//!   </module>
//! </configuration>
//! ```
//!
//! ```rust
//! use pvmodel::config::ConfigReader;
//!
//! # fn example() -> pvmodel::Result<()> {
//! let xml = r#"<configuration><module name="Motor">
//!   <variable name="speed" type="uint32" value="12"/>
//! </module></configuration>"#;
//! let config = ConfigReader::from_str(xml, "motor.xml")?;
//! assert_eq!(*config.get::<u32>("Motor/speed")?, 12);
//! assert_eq!(config.get_modules(""), vec!["Motor"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod lexer;
pub mod parser;
pub mod reader;
pub mod tree;
pub mod types;

pub use reader::ConfigReader;
pub use tree::ModuleTree;
pub use types::{ConfigArray, ConfigLookup, ConfigValue, UserType};
