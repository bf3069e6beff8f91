// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table, Table};

pub trait Entity {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_data(&self) -> Vec<(String, String)> {
        Default::default()
    }
}

pub trait ToTable {
    fn to_table(&self) -> Table;
}

impl<I: ToString, E: Entity<Id = I>> ToTable for E {
    fn to_table(&self) -> Table {
        let mut table = table![["id", self.get_id()]];

        for (key, val) in self.get_data() {
            table.add_row(row![key, val]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl Entity for Dummy {
        type Id = u32;

        fn get_id(&self) -> u32 {
            7
        }

        fn get_data(&self) -> Vec<(String, String)> {
            vec![("title".into(), "Heat".into())]
        }
    }

    #[test]
    fn table_has_id_row_first() {
        let table = Dummy.to_table();
        assert_eq!(table.len(), 2);

        let rendered = table.to_string();
        let id_at = rendered.find("id").unwrap();
        let title_at = rendered.find("title").unwrap();
        assert!(id_at < title_at);
        assert!(rendered.contains("Heat"));
    }
}
