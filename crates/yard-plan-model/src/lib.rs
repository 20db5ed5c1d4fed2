// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

pub mod emit;
pub mod err;
pub mod generator;
pub mod id;
pub mod loader;
pub mod mission;
pub mod problem;
pub mod yard;

pub mod prelude {
    pub use crate::emit::{write_missions, write_missions_path};
    pub use crate::err::{EmitError, LoadError};
    pub use crate::generator::{
        GeneratedInstance, InstanceGenConfig, InstanceGenConfigBuilder, InstanceGenerator,
    };
    pub use crate::id::{BatchId, ContainerId};
    pub use crate::loader::{
        CommandKind, CommandRecord, SnapshotRecord, load_commands_path, load_layout_path,
        load_snapshot_path,
    };
    pub use crate::mission::{
        DEFAULT_BASE_TIME, Mission, MissionKind, MissionStatus, renumber_missions,
    };
    pub use crate::problem::{Problem, ProblemBuildError, ProblemBuilder};
    pub use crate::yard::{LayoutError, YardError, YardLayout, YardState};
}
