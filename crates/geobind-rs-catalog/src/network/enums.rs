use geobind_rs_tools::coded_enum;

coded_enum! {
    /// How stops are ordered when solving a route.
    pub enum Sequence: "Sequence" {
        FindBest => ("FIND_BEST", "Find best"),
        UseCurrent => ("USE_CURRENT", "Use current"),
        PreserveFirst => ("PRESERVE_FIRST", "Preserve first"),
        PreserveLast => ("PRESERVE_LAST", "Preserve last"),
        PreserveBoth => ("PRESERVE_BOTH", "Preserve first and last"),
    }
}

coded_enum! {
    /// Where U-turns are allowed along the network.
    pub enum UturnPolicy: "UturnPolicy" {
        AllowUturns => ("ALLOW_UTURNS", "Allowed"),
        NoUturns => ("NO_UTURNS", "Not allowed"),
        DeadEndsOnly => ("ALLOW_DEAD_ENDS_ONLY", "Allowed only at dead ends"),
        DeadEndsAndIntersections => (
            "ALLOW_DEAD_ENDS_AND_INTERSECTIONS_ONLY",
            "Allowed only at dead ends and intersections"
        ),
    }
}

coded_enum! {
    /// Shape of output route lines.
    pub enum LineShape: "LineShape" {
        AlongNetwork => ("ALONG_NETWORK", "Along network"),
        StraightLine => ("STRAIGHT_LINE", "Straight line"),
        NoLines => ("NO_LINES", "No lines"),
    }
}

coded_enum! {
    /// Time zone used to interpret the time of day.
    pub enum TimeZoneUsage: "TimeZoneUsage" {
        LocalTime => ("LOCAL_TIME_AT_LOCATIONS", "Local time at locations"),
        Utc => ("UTC", "UTC"),
    }
}

coded_enum! {
    /// Whether invalid stops are skipped or halt the solve.
    pub enum InvalidLocations: "InvalidLocations" {
        Skip => ("true", "Skip invalid locations"),
        Halt => ("false", "Halt on invalid locations"),
    }
}

coded_enum! {
    /// Part of a network source a location may snap to.
    pub enum SnapType: "SnapType" {
        Shape => ("SHAPE", "Shape"),
        Middle => ("MIDDLE", "Middle"),
        End => ("END", "End"),
        NoSnapping => ("NONE", "None"),
    }
}

coded_enum! {
    /// How located features are matched to network sources.
    pub enum MatchType: "MatchType" {
        Closest => ("MATCH_TO_CLOSEST", "Closest"),
        Priority => ("PRIORITY", "Priority"),
    }
}

coded_enum! {
    /// Whether added locations extend or replace the sublayer.
    pub enum AppendMode: "AppendMode" {
        Append => ("true", "Append to existing locations"),
        Clear => ("false", "Clear existing locations"),
    }
}

coded_enum! {
    /// Whether locations are excluded from restricted network elements.
    pub enum RestrictedElements: "RestrictedElements" {
        Exclude => ("true", "Exclude restricted elements"),
        Include => ("false", "Include restricted elements"),
    }
}
