mod tests_result;
