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

//! Data types shared by every stage of the shader pipeline.

pub mod artifact;
pub mod binding;
pub mod names;
pub mod program;
pub mod source;
pub mod target;

pub use self::artifact::*;
pub use self::binding::*;
pub use self::names::*;
pub use self::program::*;
pub use self::source::*;
pub use self::target::*;
