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

use crate::{err::EmitError, mission::Mission};
use std::{fs::File, io::Write, path::Path};

const HEADER: [&str; 9] = [
    "mission_no",
    "mission_type",
    "batch_id",
    "parent_carrier_id",
    "source_position",
    "dest_position",
    "mission_priority",
    "mission_status",
    "created_time",
];

/// Writes the planned mission log as `output_missions.csv` rows.
pub fn write_missions<W: Write>(writer: W, missions: &[Mission]) -> Result<(), EmitError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for mission in missions {
        wtr.write_record([
            mission.mission_no().to_string(),
            mission.kind().to_string(),
            mission.batch_id().value().to_string(),
            mission.container_id().value().to_string(),
            mission.src_label(),
            mission.dst_label(),
            mission.priority().to_string(),
            mission.status().to_string(),
            mission.created_time().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_missions_path(
    path: impl AsRef<Path>,
    missions: &[Mission],
) -> Result<(), EmitError> {
    write_missions(File::create(path)?, missions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        id::{BatchId, ContainerId},
        mission::renumber_missions,
    };
    use yard_plan_core::slot::SlotPosition;

    #[test]
    fn emits_header_and_rendered_positions() {
        let batch = BatchId::new(20260117);
        let mut log = vec![
            Mission::target(batch, ContainerId::new(2), Some(SlotPosition::new(0, 0, 1))),
            Mission::back_into_yard(batch, ContainerId::new(2), SlotPosition::new(0, 0, 1)),
        ];
        renumber_missions(&mut log, 1_705_363_200);

        let mut out = Vec::new();
        write_missions(&mut out, &log).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "mission_no,mission_type,batch_id,parent_carrier_id,source_position,\
dest_position,mission_priority,mission_status,created_time"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,target,20260117,2,(0;0;1),work station,1,PLANNED,1705363200"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2,return,20260117,2,work station,(0;0;1),2,PLANNED,1705363230"
        );
        assert_eq!(lines.next(), None);
    }
}
