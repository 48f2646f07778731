// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::sync::Arc;

use gdls::Workspace;
use log::info;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::completions::completions;
use crate::conversion::{
    convert_diagnostic,
    convert_location,
    convert_outline_symbol,
    convert_range,
};

pub struct Backend {
    pub(crate) client: Client,
    pub(crate) workspace: Arc<Workspace>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            workspace: Arc::new(Workspace::new()),
        }
    }

    async fn publish_diagnostics(&self, uri: Url, document: &gdls::Document) {
        let diagnostics = gdls::document_diagnostics(document)
            .iter()
            .map(convert_diagnostic)
            .collect();

        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    fn document(&self, uri: &Url) -> Option<Arc<gdls::Document>> {
        self.workspace.get(uri.as_str())
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    #[allow(deprecated)]
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(folders) = &params.workspace_folders {
            for folder in folders {
                self.workspace.add_folder(folder.uri.as_str());
            }
        } else if let Some(root) = &params.root_uri {
            self.workspace.add_folder(root.as_str());
        }

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "gdls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..TextDocumentSyncOptions::default()
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                document_symbol_provider: Some(OneOf::Left(true)),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                document_link_provider: Some(DocumentLinkOptions {
                    resolve_provider: Some(false),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        "\"".to_string(),
                        "/".to_string(),
                        "=".to_string(),
                    ]),
                    ..CompletionOptions::default()
                }),
                semantic_tokens_provider: Some(
                    SemanticTokensServerCapabilities::SemanticTokensOptions(
                        SemanticTokensOptions {
                            legend: SemanticTokensLegend {
                                token_types: gdls::analysis::TOKEN_TYPES
                                    .iter()
                                    .map(|name| SemanticTokenType::new(*name))
                                    .collect(),
                                token_modifiers: gdls::analysis::TOKEN_MODIFIERS
                                    .iter()
                                    .map(|name| SemanticTokenModifier::new(*name))
                                    .collect(),
                            },
                            full: Some(SemanticTokensFullOptions::Bool(true)),
                            ..SemanticTokensOptions::default()
                        },
                    ),
                ),
                ..ServerCapabilities::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("gdls initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let document = self.workspace.open(uri.as_str(), params.text_document.text);
        self.publish_diagnostics(uri, &document).await;
    }

    async fn did_change(&self, mut params: DidChangeTextDocumentParams) {
        // Full sync: the last change carries the complete content.
        let Some(change) = params.content_changes.pop() else {
            return;
        };

        let uri = params.text_document.uri;
        let document = self.workspace.update(uri.as_str(), change.text);
        self.publish_diagnostics(uri, &document).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let Some(text) = params.text else {
            return;
        };

        let uri = params.text_document.uri;
        let document = self.workspace.update(uri.as_str(), text);
        self.publish_diagnostics(uri, &document).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.workspace.close(uri.as_str());
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let position = params.text_document_position_params;
        let Some(document) = self.document(&position.text_document.uri) else {
            return Ok(None);
        };

        let text = gdls::hover(
            &document,
            position.position.line as usize,
            position.position.character as usize,
        );

        Ok(text.map(|value| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let position = params.text_document_position_params;
        let Some(document) = self.document(&position.text_document.uri) else {
            return Ok(None);
        };

        let location = gdls::find_definition(
            &document,
            &self.workspace.folders(),
            position.position.line as usize,
            position.position.character as usize,
        );

        Ok(location
            .as_ref()
            .and_then(convert_location)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let position = params.text_document_position;
        let Some(document) = self.document(&position.text_document.uri) else {
            return Ok(None);
        };

        let locations = gdls::find_references(
            &document,
            position.position.line as usize,
            position.position.character as usize,
            params.context.include_declaration,
        );

        Ok(Some(
            locations.iter().filter_map(convert_location).collect(),
        ))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let Some(document) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };

        let symbols = gdls::document_symbols(&document)
            .iter()
            .map(convert_outline_symbol)
            .collect();

        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let Some(document) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };

        let ranges = gdls::folding_ranges(&document)
            .into_iter()
            .map(|range| FoldingRange {
                start_line: range.start_line as u32,
                end_line: range.end_line as u32,
                kind: Some(FoldingRangeKind::Region),
                ..FoldingRange::default()
            })
            .collect();

        Ok(Some(ranges))
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        let Some(document) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };
        let Some(ast) = document.tscn.as_ref() else {
            return Ok(None);
        };

        let folders = self.workspace.folders();
        let mut links = Vec::new();

        for ext in &ast.ext_resources {
            if ext.path.is_empty() {
                continue;
            }

            let Some(target) = gdls::resolve_resource_path(&ext.path, &document.uri, &folders) else {
                continue;
            };
            let Ok(target) = Url::parse(&target) else {
                continue;
            };

            let link_range = if ext.path_range.is_empty() {
                ext.range
            } else {
                ext.path_range
            };

            links.push(DocumentLink {
                range: convert_range(link_range),
                target: Some(target),
                tooltip: Some(format!("Open {}", ext.path)),
                data: None,
            });
        }

        Ok(Some(links))
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let Some(document) = self.document(&params.text_document.uri) else {
            return Ok(None);
        };
        let Some(ast) = document.tscn.as_ref() else {
            return Ok(None);
        };

        let data = gdls::tscn_semantic_tokens(ast)
            .chunks(5)
            .map(|chunk| SemanticToken {
                delta_line: chunk[0],
                delta_start: chunk[1],
                length: chunk[2],
                token_type: chunk[3],
                token_modifiers_bitset: chunk[4],
            })
            .collect();

        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let Some(document) = self.document(&position.text_document.uri) else {
            return Ok(None);
        };

        let items = completions(
            &document,
            position.position.line as usize,
            position.position.character as usize,
        );

        Ok(Some(CompletionResponse::List(CompletionList {
            is_incomplete: false,
            items,
        })))
    }
}
