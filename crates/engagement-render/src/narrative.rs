//! Fixed report text.

pub const REPORT_TITLE: &str = "Report";

pub const TOP_COMMENTERS_HEADING: &str = "Chart of the Most Active Commenters:";
pub const TOP_COMMENTERS_TEXT: &str = "Account analysis is valuable because it helps identify \
which users interact with your content most frequently, such as leaving comments.";

pub const HOURLY_HEADING: &str = "Chart of Average Number of Comments per Hour:";
pub const HOURLY_TEXT: &str = "This analysis helps determine the best times of the day to \
publish content when audience engagement is highest. It's important because different \
audiences may be active at different times.";

pub const RESULTS_HEADING: &str = "Table of Results:";
pub const Z_SCORE_TEXT: &str = "I use the Z-score to determine how different a specific data \
point is from the mean in a statistical distribution. This allows me to determine whether the \
value is statistically different from the average. In my context, I use the Z-score for the \
number of comments on each post to determine whether this number is statistically different \
from the average number of comments for all posts. If the Z-score exceeds 1.96 (which \
corresponds to a 95% confidence interval), then I consider the post successful.";
pub const INTERACTION_TEXT: &str = "I have also calculated the Interaction Score using this \
metric to measure how effectively users interact with posts. Interactions such as the number \
of comments and the number of followers are taken into account.";
