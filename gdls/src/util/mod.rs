// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

mod paths;
mod source_location;
mod source_range;

pub use self::{
    paths::{find_project_root, path_to_uri, resolve_resource_path, uri_to_path},
    source_location::SourceLocation,
    source_range::SourceRange,
};
