//! Shared fixtures and service doubles for dispatch tests.

use mockall::mock;
use thiserror::Error;

use crate::mdm::{
    Authenticate, CheckOut, Command, CommandResults, MessageType, Request, TokenUpdate,
};
use crate::service::{Checkin, CommandAndReportResults, ServiceError};

/// Error returned by service doubles; compared by value after downcasting.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("store error: {0}")]
pub struct StoreError(pub &'static str);

mock! {
    pub CheckinService {}
    impl Checkin for CheckinService {
        fn authenticate(&self, request: &Request, message: &Authenticate) -> Result<(), ServiceError>;
        fn token_update(&self, request: &Request, message: &TokenUpdate) -> Result<(), ServiceError>;
        fn check_out(&self, request: &Request, message: &CheckOut) -> Result<(), ServiceError>;
    }
}

mock! {
    pub CommandService {}
    impl CommandAndReportResults for CommandService {
        fn command_and_report_results(
            &self,
            request: &Request,
            results: &CommandResults,
        ) -> Result<Option<Command>, ServiceError>;
    }
}

/// Wraps dictionary entries in an XML property list document.
pub fn plist_document(entries: &str) -> Vec<u8> {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" ",
            "\"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
            "<plist version=\"1.0\">\n<dict>\n{}\n</dict>\n</plist>\n",
        ),
        entries
    )
    .into_bytes()
}

/// Wire encoding applied to an XML fixture before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Xml,
    Binary,
}

impl Encoding {
    pub fn encode(self, xml: Vec<u8>) -> Vec<u8> {
        match self {
            Self::Xml => xml,
            Self::Binary => {
                let value =
                    plist::Value::from_reader(std::io::Cursor::new(xml)).expect("parse fixture");
                let mut body = Vec::new();
                value
                    .to_writer_binary(&mut body)
                    .expect("encode binary fixture");
                body
            }
        }
    }
}

pub fn authenticate_body(udid: &str) -> Vec<u8> {
    plist_document(&format!(
        "<key>MessageType</key><string>Authenticate</string>\
         <key>UDID</key><string>{udid}</string>\
         <key>Topic</key><string>com.apple.mgmt.External.test</string>\
         <key>SerialNumber</key><string>C02TEST0001</string>\
         <key>OSVersion</key><string>17.4</string>\
         <key>Model</key><string>Mac14,2</string>"
    ))
}

pub fn token_update_body(udid: &str) -> Vec<u8> {
    plist_document(&format!(
        "<key>MessageType</key><string>TokenUpdate</string>\
         <key>UDID</key><string>{udid}</string>\
         <key>Topic</key><string>com.apple.mgmt.External.test</string>\
         <key>PushMagic</key><string>magic-1</string>\
         <key>Token</key><data>dG9rZW4=</data>\
         <key>UnlockToken</key><data>dW5sb2Nr</data>\
         <key>AwaitingConfiguration</key><true/>"
    ))
}

pub fn checkout_body(udid: &str) -> Vec<u8> {
    plist_document(&format!(
        "<key>MessageType</key><string>CheckOut</string>\
         <key>UDID</key><string>{udid}</string>\
         <key>Topic</key><string>com.apple.mgmt.External.test</string>"
    ))
}

/// Builds a well-formed body for any declared check-in kind.
pub fn checkin_body(message_type: MessageType, udid: &str) -> Vec<u8> {
    match message_type {
        MessageType::Authenticate => authenticate_body(udid),
        MessageType::TokenUpdate => token_update_body(udid),
        MessageType::CheckOut => checkout_body(udid),
    }
}

pub fn report_body(status: &str, command_uuid: Option<&str>) -> Vec<u8> {
    let uuid = command_uuid
        .map(|uuid| format!("<key>CommandUUID</key><string>{uuid}</string>"))
        .unwrap_or_default();
    plist_document(&format!(
        "<key>UDID</key><string>device-1</string>\
         <key>Status</key><string>{status}</string>{uuid}"
    ))
}

pub fn command_body(command_uuid: &str, request_type: &str) -> Vec<u8> {
    plist_document(&format!(
        "<key>CommandUUID</key><string>{command_uuid}</string>\
         <key>Command</key><dict>\
         <key>RequestType</key><string>{request_type}</string>\
         </dict>"
    ))
}
