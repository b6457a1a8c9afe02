/// One canned `log show` query offered in the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub predicate: &'static str,
    pub report_memory: bool,
}

pub const RUN_ALL_ID: &str = "13";

// Menu order is also the "run all" order.
pub static CATALOG: &[DiagnosticCategory] = &[
    DiagnosticCategory { id: "1", name: "Spotlight Knowledge", description: "spotlightknowledged activity (Siri/Spotlight suggestions indexing)", predicate: r#"process == "spotlightknowledged""#, report_memory: false },
    DiagnosticCategory { id: "2", name: "Spotlight Index Stores", description: "mds_stores, the Spotlight index writer", predicate: r#"process == "mds_stores""#, report_memory: false },
    DiagnosticCategory { id: "3", name: "File System Events", description: "fseventsd, feeds file change notifications to indexers and backups", predicate: r#"process == "fseventsd""#, report_memory: false },
    DiagnosticCategory { id: "4", name: "Time Machine Backup", description: "backupd, the Time Machine agent", predicate: r#"process == "backupd""#, report_memory: false },
    DiagnosticCategory { id: "5", name: "Memory Pressure", description: "vmpressure notifications and memory pressure transitions", predicate: r#"eventMessage CONTAINS[c] "vmpressure" OR eventMessage CONTAINS[c] "memory pressure""#, report_memory: false },
    DiagnosticCategory { id: "6", name: "Process Crashes / Spawn Failures", description: "launchd jobs exiting with an error code or failing to spawn", predicate: r#"eventMessage CONTAINS[c] "exited with code" OR eventMessage CONTAINS[c] "could not spawn""#, report_memory: false },
    DiagnosticCategory { id: "7", name: "Spotlight Workers / Importers", description: "mdworker processes and mdimporter plugins", predicate: r#"process CONTAINS[c] "mdworker" OR eventMessage CONTAINS[c] "mdimporter""#, report_memory: false },
    DiagnosticCategory { id: "8", name: "Memory Limits / Jetsam", description: "highwater marks and jetsam kills", predicate: r#"eventMessage CONTAINS[c] "highwater" OR eventMessage CONTAINS[c] "jetsam""#, report_memory: false },
    DiagnosticCategory { id: "9", name: "WindowServer", description: "WindowServer stalls and GPU/display issues", predicate: r#"process == "WindowServer""#, report_memory: false },
    DiagnosticCategory { id: "10", name: "Login Window", description: "loginwindow and login session events", predicate: r#"process == "loginwindow" OR eventMessage CONTAINS[c] "login""#, report_memory: false },
    DiagnosticCategory { id: "11", name: "Snapshots / Disk Management", description: "APFS snapshot activity and diskmanagementd", predicate: r#"eventMessage CONTAINS[c] "snapshot" OR process == "diskmanagementd""#, report_memory: false },
    DiagnosticCategory { id: "12", name: "Backblaze Agents", description: "bzserv, bztransmit and bzfilelist, plus their current memory use", predicate: r#"process == "bzserv" OR process == "bztransmit" OR process == "bzfilelist""#, report_memory: true },
];

pub fn find(id: &str) -> Option<&'static DiagnosticCategory> {
    CATALOG.iter().find(|c| c.id == id)
}
