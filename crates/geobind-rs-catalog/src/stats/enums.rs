use geobind_rs_tools::coded_enum;

coded_enum! {
    /// How spatial relationships among features are defined.
    pub enum SpatialRelationship: "SpatialRelationship" {
        InverseDistance => ("INVERSE_DISTANCE", "Inverse distance"),
        InverseDistanceSquared => ("INVERSE_DISTANCE_SQUARED", "Inverse distance squared"),
        FixedDistanceBand => ("FIXED_DISTANCE_BAND", "Fixed distance band"),
        ZoneOfIndifference => ("ZONE_OF_INDIFFERENCE", "Zone of indifference"),
        ContiguityEdgesOnly => ("CONTIGUITY_EDGES_ONLY", "Contiguity edges only"),
        ContiguityEdgesCorners => ("CONTIGUITY_EDGES_CORNERS", "Contiguity edges corners"),
        WeightsFromFile => ("GET_SPATIAL_WEIGHTS_FROM_FILE", "Get spatial weights from file"),
        KNearestNeighbors => ("K_NEAREST_NEIGHBORS", "K nearest neighbors"),
    }
}

coded_enum! {
    /// Distance metric between features.
    pub enum DistanceMethod: "DistanceMethod" {
        Euclidean => ("EUCLIDEAN_DISTANCE", "Euclidean"),
        Manhattan => ("MANHATTAN_DISTANCE", "Manhattan"),
    }
}

coded_enum! {
    /// Row standardization of spatial weights.
    pub enum Standardization: "Standardization" {
        Row => ("ROW", "Row"),
        Unstandardized => ("NONE", "None"),
    }
}

coded_enum! {
    /// False discovery rate correction of significance.
    pub enum FdrCorrection: "FdrCorrection" {
        Apply => ("true", "Apply false discovery rate correction"),
        Skip => ("false", "No correction"),
    }
}

coded_enum! {
    /// Regression model for the dependent variable.
    pub enum ModelType: "ModelType" {
        Continuous => ("CONTINUOUS", "Continuous (Gaussian)"),
        Binary => ("BINARY", "Binary (Logistic)"),
        Count => ("COUNT", "Count (Poisson)"),
    }
}

coded_enum! {
    /// How the local neighborhood is sized.
    pub enum NeighborhoodType: "NeighborhoodType" {
        NumberOfNeighbors => ("NUMBER_OF_NEIGHBORS", "Number of neighbors"),
        DistanceBand => ("DISTANCE_BAND", "Distance band"),
    }
}

coded_enum! {
    /// How the neighborhood size is chosen.
    pub enum SelectionMethod: "SelectionMethod" {
        GoldenSearch => ("GOLDEN_SEARCH", "Golden search"),
        ManualIntervals => ("MANUAL_INTERVALS", "Manual intervals"),
        UserDefined => ("USER_DEFINED", "User defined"),
    }
}

coded_enum! {
    /// Kernel used to weight neighbors.
    pub enum WeightingScheme: "WeightingScheme" {
        Bisquare => ("BISQUARE", "Bisquare"),
        Gaussian => ("GAUSSIAN", "Gaussian"),
    }
}

coded_enum! {
    /// Whether explanatory variables are standardized before fitting.
    pub enum ScaleData: "ScaleData" {
        Scale => ("true", "Scale data"),
        Raw => ("false", "Do not scale data"),
    }
}
