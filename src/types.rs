/// Column header name as it appears in a coding-tool export.
/// Example: `User Profile`
pub type ColumnName = String;
/// Unique external item code (the natural key used for deduplication).
/// Example: `0001234567`
pub type ExternalCode = String;
/// Operator/user identifier recorded by the coding tool.
/// Example: `JANE DOE - US CROSS/CHAR CODER`
pub type OperatorId = String;
/// Category/module name derived from the item description.
/// Example: `DOG FOOD WET`
pub type ModuleName = String;
/// Retailer label produced by the classifier.
/// Examples: `Amazon`, `Ecom`, `B&M`
pub type RetailerLabel = String;
/// Change-type label recorded by the coding tool.
/// Example: `UPC MATCHING FOR RECEIPT DATA`
pub type ChangeType = String;
