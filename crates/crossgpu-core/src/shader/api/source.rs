// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shader source text and its diagnostic label.

use std::borrow::Cow;
use std::fmt;

/// The origin label given to sources that do not come from a real file.
pub const MEMORY_LABEL: &str = "[memory]";

/// Raw text in the portable shading language, tagged with an origin label.
///
/// The label only shows up in diagnostics; no file has to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource<'a> {
    label: Cow<'a, str>,
    text: Cow<'a, str>,
}

impl<'a> ShaderSource<'a> {
    /// Wraps `text` with the default [`MEMORY_LABEL`].
    pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            label: Cow::Borrowed(MEMORY_LABEL),
            text: text.into(),
        }
    }

    /// Replaces the origin label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// The origin label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<'a> From<&'a str> for ShaderSource<'a> {
    fn from(text: &'a str) -> Self {
        ShaderSource::new(text)
    }
}

impl fmt::Display for ShaderSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
