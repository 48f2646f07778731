// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod backend;
mod completions;
mod conversion;

use log::{LevelFilter, Log};
use tower_lsp::lsp_types::MessageType;
use tower_lsp::{Client, LspService, Server};

use self::backend::Backend;

#[tokio::main]
async fn main() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    log::set_max_level(LevelFilter::Info);

    let (service, socket) = LspService::new(|client| {
        log::set_logger(Box::leak(Box::new(Logger {
            client: client.clone(),
        })))
        .expect("no other logger is installed");

        Backend::new(client)
    });

    Server::new(stdin, stdout, socket).serve(service).await;
}

/// Forwards log records to the client via `window/logMessage`.
struct Logger {
    client: Client,
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let message_type = match record.level() {
            log::Level::Error => MessageType::ERROR,
            log::Level::Warn => MessageType::WARNING,
            _ => MessageType::INFO,
        };

        let client = self.client.clone();
        let message = format!("{}", record.args());
        tokio::task::spawn(async move {
            client.log_message(message_type, message).await;
        });
    }

    fn flush(&self) {}
}
